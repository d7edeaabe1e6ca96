//! Click primitive - scroll, settle, click

use page_adapter::{NodeId, PageDocument};
use std::time::Duration;
use tracing::{debug, info};

use crate::{errors::ActionError, types::ExecCtx, waiting::settle};

/// Execute click primitive
///
/// Steps:
/// 1. Scroll the element into view
/// 2. Wait the settle time so late layout can finish
/// 3. Click
pub async fn execute_click(
    ctx: &ExecCtx,
    document: &dyn PageDocument,
    node: NodeId,
    settle_time: Duration,
) -> Result<(), ActionError> {
    info!(
        action_id = %ctx.action_id,
        node = %node,
        settle_ms = settle_time.as_millis() as u64,
        "Executing click primitive"
    );

    document.scroll_into_view(node).await?;
    settle(settle_time).await;

    debug!("Dispatching click");
    document.click(node).await?;

    info!(
        action_id = %ctx.action_id,
        latency_ms = ctx.elapsed_ms(),
        "Click completed successfully"
    );
    Ok(())
}
