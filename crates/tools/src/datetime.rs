//! Current date/time tool.
//!
//! Reads the clock in the caller's timezone (from the per-request
//! [`ToolContext`]) and returns an RFC 3339 timestamp with offset.
//! Deliberately uncached: two calls in one round-trip return two
//! independent readings.

use async_trait::async_trait;
use chrono::Utc;
use deskline_core::error::ToolError;
use deskline_core::tool::{Tool, ToolContext, ToolResult};
use tracing::debug;

pub struct CurrentDateTimeTool;

#[async_trait]
impl Tool for CurrentDateTimeTool {
    fn name(&self) -> &str {
        "current_datetime"
    }

    fn description(&self) -> &str {
        "Get the current date and time in the user's timezone. Use this whenever the user asks about the time, the date, or anything relative to now."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(
        &self,
        ctx: &ToolContext,
        _arguments: serde_json::Value,
    ) -> std::result::Result<ToolResult, ToolError> {
        let now = Utc::now().with_timezone(&ctx.timezone);
        debug!(zone = %ctx.timezone, "Date tool called");

        Ok(ToolResult {
            call_id: String::new(),
            success: true,
            output: now.to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Tz;

    #[tokio::test]
    async fn returns_rfc3339_timestamp() {
        let tool = CurrentDateTimeTool;
        let result = tool
            .execute(&ToolContext::default(), serde_json::json!({}))
            .await
            .unwrap();

        assert!(result.success);
        assert!(chrono::DateTime::parse_from_rfc3339(&result.output).is_ok());
    }

    #[tokio::test]
    async fn respects_caller_timezone() {
        let tool = CurrentDateTimeTool;
        let ctx = ToolContext {
            timezone: "Asia/Kolkata".parse::<Tz>().unwrap(),
        };
        let result = tool.execute(&ctx, serde_json::json!({})).await.unwrap();

        // IST is UTC+05:30 year-round
        assert!(result.output.ends_with("+05:30"));
    }

    #[tokio::test]
    async fn readings_are_not_cached() {
        let tool = CurrentDateTimeTool;
        let ctx = ToolContext::default();

        let first = tool.execute(&ctx, serde_json::json!({})).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = tool.execute(&ctx, serde_json::json!({})).await.unwrap();

        let a = chrono::DateTime::parse_from_rfc3339(&first.output).unwrap();
        let b = chrono::DateTime::parse_from_rfc3339(&second.output).unwrap();
        assert!(b > a);
    }
}
