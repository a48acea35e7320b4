//! JavaScript execution operations for CDP page session.

use serde_json::{json, Value};

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Evaluate a JavaScript expression and return its value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception["exception"]["description"]
                .as_str()
                .or_else(|| exception["text"].as_str())
                .unwrap_or("Unknown error");
            return Err(CdpError::JavaScript(text.to_string()));
        }

        Ok(result["result"]["value"].clone())
    }

    /// Call a function expression with JSON arguments and return its value.
    pub async fn call_function(&self, function: &str, args: &[Value]) -> Result<Value, CdpError> {
        let expression = Self::call_expression(function, args)?;
        self.evaluate(&expression).await
    }

    /// `(function)(arg1, arg2, ...)` with arguments inlined as JSON literals.
    pub(crate) fn call_expression(function: &str, args: &[Value]) -> Result<String, CdpError> {
        let args = args
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("({})({})", function.trim().trim_end_matches(';'), args.join(", ")))
    }
}
