use crate::coin_page::ObjectsPage;
use crate::error::{SnapshotError, SnapshotResult};
use crate::snapshot_utils::balance_accumulator::BalanceAccumulator;

/// Source of coin object pages, one request per call.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    async fn fetch_page(&mut self, cursor: Option<&str>) -> SnapshotResult<ObjectsPage>;
}

/// Source of the coin's display decimals.
#[allow(async_fn_in_trait)]
pub trait MetadataFetcher {
    /// `None` when the coin has no metadata or the value isn't a non-negative integer.
    async fn fetch_decimals(&mut self) -> SnapshotResult<Option<u32>>;
}

/// Pages through every coin object and adds each address-owned balance to `accumulator`.
pub async fn aggregate<Fetcher: PageFetcher>(
    fetcher: &mut Fetcher,
    mut accumulator: BalanceAccumulator,
) -> SnapshotResult<BalanceAccumulator> {
    let mut cursor: Option<String> = None;
    let mut page_number = 0u64;

    loop {
        let page = fetcher.fetch_page(cursor.as_deref()).await?;
        page_number += 1;

        let connection = page.objects.ok_or_else(|| {
            SnapshotError::MalformedResponse(format!("page {page_number} has no objects"))
        })?;
        let page_info = connection.page_info.ok_or_else(|| {
            SnapshotError::MalformedResponse(format!("page {page_number} has no pageInfo"))
        })?;
        let nodes = connection.nodes.ok_or_else(|| {
            SnapshotError::MalformedResponse(format!("page {page_number} has no nodes"))
        })?;

        let coin_count = nodes.len();
        for node in nodes.iter() {
            match node.holder()? {
                Some((owner, balance)) => accumulator.add_balance(owner, &balance),
                None => accumulator.mark_skipped(),
            }
        }

        tracing::info!(
            "fetched page {:?}, coins: {:?}, holders so far: {:?}",
            page_number,
            coin_count,
            accumulator.len()
        );

        if !page_info.has_next_page {
            break;
        }
        cursor = match page_info.end_cursor {
            Some(end_cursor) => Some(end_cursor),
            None => {
                return Err(SnapshotError::MalformedResponse(format!(
                    "page {page_number} has a next page but no endCursor"
                )))
            }
        };
    }

    if accumulator.skipped_objects() > 0 {
        tracing::debug!(
            "skipped {:?} coin objects without an address owner",
            accumulator.skipped_objects()
        );
    }

    Ok(accumulator)
}
