//! Fixture-backed page driver.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

use glimpse_protocols::{
    DomElement, DriverError, ElementGeometry, ElementHandle, PageDriver, Viewport,
};

use crate::model::{FixtureElement, PageModel};

/// Driver call recorded by a [`FixturePage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    Hover(ElementHandle),
    MoveAway,
}

#[derive(Debug, Default)]
struct PageState {
    hovered: Option<u64>,
    /// Active effects (index into the model) and when they were activated.
    active: Vec<(usize, Instant)>,
    events: Vec<PageEvent>,
    enumerations: usize,
}

/// In-memory page that replays a [`PageModel`].
pub struct FixturePage {
    model: PageModel,
    state: Mutex<PageState>,
}

impl FixturePage {
    pub fn new(model: PageModel) -> Self {
        Self {
            model,
            state: Mutex::new(PageState::default()),
        }
    }

    pub fn model(&self) -> &PageModel {
        &self.model
    }

    /// Element currently under the pointer.
    pub fn hovered(&self) -> Option<ElementHandle> {
        self.state.lock().hovered.map(ElementHandle::new)
    }

    /// Every hover and move-away call so far, in order.
    pub fn events(&self) -> Vec<PageEvent> {
        self.state.lock().events.clone()
    }

    /// Number of `enumerate` calls so far.
    pub fn enumerations(&self) -> usize {
        self.state.lock().enumerations
    }

    /// Effects whose changes are currently showing.
    fn effective(&self, state: &PageState) -> Vec<usize> {
        let now = Instant::now();
        state
            .active
            .iter()
            .filter(|(index, since)| {
                let delay = Duration::from_millis(self.model.hover_effects[*index].reveal_after_ms);
                now.duration_since(*since) >= delay
            })
            .map(|(index, _)| *index)
            .collect()
    }

    fn find_element(&self, id: u64, effects: &[usize]) -> Option<&FixtureElement> {
        self.model.elements.iter().find(|e| e.id == id).or_else(|| {
            effects
                .iter()
                .flat_map(|i| self.model.hover_effects[*i].insert.iter())
                .find(|e| e.id == id)
        })
    }
}

#[async_trait]
impl PageDriver for FixturePage {
    async fn viewport(&self) -> Result<Viewport, DriverError> {
        Ok(self.model.viewport)
    }

    async fn enumerate(&self) -> Result<Vec<DomElement>, DriverError> {
        if self.model.enumerate_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.model.enumerate_delay_ms)).await;
        }
        let mut state = self.state.lock();
        state.enumerations += 1;
        let effects = self.effective(&state);

        let mut elements: Vec<DomElement> =
            self.model.elements.iter().map(FixtureElement::to_dom_element).collect();
        for index in effects {
            elements.extend(
                self.model.hover_effects[index]
                    .insert
                    .iter()
                    .map(FixtureElement::to_dom_element),
            );
        }
        Ok(elements)
    }

    async fn read_geometry(&self, handle: &ElementHandle) -> Result<ElementGeometry, DriverError> {
        if self.model.geometry_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.model.geometry_delay_ms)).await;
        }
        let state = self.state.lock();
        let effects = self.effective(&state);

        let element = self
            .find_element(handle.raw(), &effects)
            .ok_or_else(|| DriverError::StaleElement(handle.to_string()))?;
        if element.detached {
            return Err(DriverError::StaleElement(handle.to_string()));
        }
        if element.broken {
            return Err(DriverError::Script(format!("geometry read on {} threw", handle)));
        }

        let geometry = effects
            .iter()
            .flat_map(|i| self.model.hover_effects[*i].reveal.iter())
            .rfind(|o| o.id == handle.raw())
            .map(|o| o.geometry)
            .unwrap_or(element.geometry);
        Ok(geometry)
    }

    async fn hover(&self, handle: &ElementHandle) -> Result<(), DriverError> {
        let id = handle.raw();
        let effect_index = self.model.hover_effects.iter().position(|e| e.trigger == id);

        {
            let mut state = self.state.lock();
            state.events.push(PageEvent::Hover(*handle));
            let effects = self.effective(&state);
            if self.find_element(id, &effects).is_none() {
                return Err(DriverError::StaleElement(handle.to_string()));
            }
        }

        if let Some(index) = effect_index {
            let effect = &self.model.hover_effects[index];
            if effect.hover_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(effect.hover_delay_ms)).await;
            }
            if effect.fail {
                return Err(DriverError::Backend(format!("hover on {} failed", handle)));
            }
        }

        let mut state = self.state.lock();
        state.hovered = Some(id);
        if let Some(index) = effect_index {
            if !state.active.iter().any(|(i, _)| *i == index) {
                debug!("Fixture effect on {} activated", handle);
                state.active.push((index, Instant::now()));
            }
        }
        Ok(())
    }

    async fn move_away(&self) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        state.events.push(PageEvent::MoveAway);
        state.hovered = None;
        let effects = &self.model.hover_effects;
        state.active.retain(|(index, _)| effects[*index].sticky);
        Ok(())
    }
}

#[cfg(test)]
#[path = "page_tests.rs"]
mod tests;
