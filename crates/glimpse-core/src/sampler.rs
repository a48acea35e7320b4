//! Geometry sampling.

use std::future::Future;

use tokio::time::Instant;
use tracing::{debug, warn};

use glimpse_protocols::{DriverError, ElementGeometry, PageDriver};

use crate::dom::DomIndex;
use crate::error::SnapshotError;

/// One enumeration of the document plus the geometry read for it.
#[derive(Debug)]
pub struct Sample {
    pub index: DomIndex,
    /// Geometry per position; `None` when stale or not read before the deadline.
    pub geometry: Vec<Option<ElementGeometry>>,
    /// Elements that detached between enumeration and the geometry read.
    pub stale: usize,
    /// Elements whose geometry read failed for another reason.
    pub failed: usize,
    /// The deadline expired before every element was read.
    pub incomplete: bool,
}

impl Sample {
    pub fn geometry(&self, pos: usize) -> Option<&ElementGeometry> {
        self.geometry[pos].as_ref()
    }

    /// Elements with geometry.
    pub fn sampled(&self) -> usize {
        self.geometry.iter().filter(|g| g.is_some()).count()
    }
}

/// Enumerates the document and reads geometry in batches.
#[derive(Debug, Clone)]
pub struct GeometrySampler {
    batch_size: usize,
}

impl GeometrySampler {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Take a sample.
    ///
    /// A stale element is treated as not visible. When `deadline` passes,
    /// remaining elements stay unread and the sample is marked incomplete;
    /// a batch still in flight at that moment is abandoned. Failing to
    /// enumerate, including running out of time before enumeration returns,
    /// or a batch read failing as a whole, is an error.
    pub async fn sample<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        deadline: Option<Instant>,
    ) -> Result<Sample, SnapshotError> {
        let elements = until(deadline, driver.enumerate())
            .await
            .ok_or_else(|| {
                SnapshotError::Driver(DriverError::Timeout(
                    "document enumeration did not finish before the deadline".to_string(),
                ))
            })?
            .map_err(SnapshotError::Driver)?;
        let index = DomIndex::build(elements);
        let handles = index.handles();

        let mut geometry = Vec::with_capacity(handles.len());
        let mut stale = 0;
        let mut failed = 0;
        let mut incomplete = false;

        for chunk in handles.chunks(self.batch_size) {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                warn!(
                    "Deadline reached after sampling {} of {} elements",
                    geometry.len(),
                    handles.len()
                );
                incomplete = true;
                break;
            }

            let Some(results) = until(deadline, driver.read_geometry_batch(chunk)).await else {
                warn!(
                    "Deadline reached while reading geometry, {} of {} elements sampled",
                    geometry.len(),
                    handles.len()
                );
                incomplete = true;
                break;
            };
            let results = results.map_err(SnapshotError::Driver)?;
            if results.len() != chunk.len() {
                return Err(SnapshotError::Driver(
                    DriverError::InvalidResponse(format!(
                        "asked for {} geometries, got {}",
                        chunk.len(),
                        results.len()
                    )),
                ));
            }

            for (handle, result) in chunk.iter().zip(results) {
                match result {
                    Ok(g) => geometry.push(Some(g)),
                    Err(e) if e.is_stale() => {
                        debug!("Skipping {}: {}", handle, SnapshotError::from(e));
                        stale += 1;
                        geometry.push(None);
                    }
                    Err(e) => {
                        debug!("Geometry read for {} failed: {}", handle, e);
                        failed += 1;
                        geometry.push(None);
                    }
                }
            }
        }

        if failed > 0 {
            warn!("{} geometry reads failed, treating those elements as not visible", failed);
        }
        geometry.resize(handles.len(), None);

        Ok(Sample {
            index,
            geometry,
            stale,
            failed,
            incomplete,
        })
    }
}

/// Await `fut`, giving up at `deadline`.
async fn until<F: Future>(deadline: Option<Instant>, fut: F) -> Option<F::Output> {
    match deadline {
        Some(d) => tokio::time::timeout_at(d, fut).await.ok(),
        None => Some(fut.await),
    }
}

#[cfg(test)]
#[path = "sampler_tests.rs"]
mod tests;
