use crate::error::SnapshotResult;
use crate::fetcher::{aggregate, MetadataFetcher, PageFetcher};
use crate::snapshot_utils::allocation::allocate;
use crate::snapshot_utils::balance_accumulator::BalanceAccumulator;
use crate::snapshot_utils::holder_eligibility::HolderEligibility;
use crate::snapshot_utils::report::{build_report, rank_rows, Report};
use crate::units::{to_display, DisplayAmount};
use num_bigint::BigUint;

#[derive(Debug, Default, Clone)]
pub struct SnapshotRequest {
    pub airdrop: Option<DisplayAmount>,
    pub excluded: HolderEligibility,
}

/// Runs one full snapshot: decimals lookup, paging, optional airdrop split.
///
/// The airdrop amount is checked against the coin's decimals before any coin
/// page is requested.
pub async fn take_snapshot<Source: PageFetcher + MetadataFetcher>(
    source: &mut Source,
    request: &SnapshotRequest,
) -> SnapshotResult<Report> {
    let decimals = match source.fetch_decimals().await? {
        Some(decimals) => decimals,
        None => {
            tracing::warn!("coin metadata has no usable decimals, using 0");
            0
        }
    };
    tracing::info!("Decimals: {:?}", decimals);

    let airdrop_raw = request
        .airdrop
        .as_ref()
        .map(|amount| amount.to_raw(decimals))
        .transpose()?;

    let accumulator = aggregate(source, BalanceAccumulator::new()).await?;
    tracing::info!(
        "Total holders: {:?}, total balance: {}",
        accumulator.len(),
        to_display(&accumulator.total(), decimals)
    );

    let rows = rank_rows(accumulator.to_rows());

    let allocation = match airdrop_raw {
        Some(total_raw) => {
            tracing::info!(
                "Excluded addresses: {:?}",
                request.excluded.total_excluded_addresses()
            );
            for address in request.excluded.excluded_addresses() {
                if !rows.iter().any(|row| row.address.eq_ignore_ascii_case(address)) {
                    tracing::warn!("excluded address {} holds no coins", address);
                }
            }
            let allocation = allocate(&rows, &total_raw, &request.excluded)?;
            tracing::info!(
                "Airdrop of {} split across {:?} holders",
                to_display(&total_raw, decimals),
                allocation
                    .values()
                    .filter(|share| **share != BigUint::default())
                    .count()
            );
            Some(allocation)
        }
        None => None,
    };

    Ok(build_report(rows, decimals, allocation.as_ref()))
}

#[cfg(test)]
mod tests {
    use crate::coin_page::ObjectsPage;
    use crate::error::{SnapshotError, SnapshotResult};
    use crate::fetcher::{MetadataFetcher, PageFetcher};
    use crate::snapshot::{take_snapshot, SnapshotRequest};
    use crate::snapshot_utils::holder_eligibility::HolderEligibility;
    use crate::units::DisplayAmount;
    use std::collections::VecDeque;
    use std::str::FromStr;

    struct FakeIndexer {
        decimals: Option<u32>,
        pages: VecDeque<ObjectsPage>,
        pages_requested: usize,
    }

    impl FakeIndexer {
        fn new(decimals: Option<u32>, pages: Vec<ObjectsPage>) -> Self {
            Self {
                decimals,
                pages: pages.into(),
                pages_requested: 0,
            }
        }
    }

    impl PageFetcher for FakeIndexer {
        async fn fetch_page(&mut self, _cursor: Option<&str>) -> SnapshotResult<ObjectsPage> {
            self.pages_requested += 1;
            self.pages
                .pop_front()
                .ok_or_else(|| SnapshotError::Transport("no more pages".to_string()))
        }
    }

    impl MetadataFetcher for FakeIndexer {
        async fn fetch_decimals(&mut self) -> SnapshotResult<Option<u32>> {
            Ok(self.decimals)
        }
    }

    fn airdrop(amount: &str, excluded: &str) -> SnapshotRequest {
        SnapshotRequest {
            airdrop: Some(DisplayAmount::from_str(amount).unwrap()),
            excluded: HolderEligibility::from_list(excluded),
        }
    }

    #[tokio::test]
    async fn balances_only() {
        let mut indexer = FakeIndexer::new(
            Some(2),
            vec![
                ObjectsPage::new(vec![("0xa", "100"), ("0xb", "50")], true, Some("c1")),
                ObjectsPage::new(vec![("0xa", "25")], false, None),
            ],
        );
        let report = take_snapshot(&mut indexer, &SnapshotRequest::default())
            .await
            .unwrap();
        assert_eq!(report.render(), "rank,address,balance\n1,0xa,1.25\n2,0xb,0.5\n");
    }

    #[tokio::test]
    async fn airdrop_with_remainder() {
        let mut indexer = FakeIndexer::new(
            None,
            vec![ObjectsPage::new(
                vec![("0xc", "100"), ("0xa", "100"), ("0xb", "100")],
                false,
                None,
            )],
        );
        let report = take_snapshot(&mut indexer, &airdrop("10", ""))
            .await
            .unwrap();
        assert_eq!(
            report.render(),
            "rank,address,balance,airdrop_amount\n1,0xa,100,4\n2,0xb,100,3\n3,0xc,100,3\n"
        );
    }

    #[tokio::test]
    async fn airdrop_skips_excluded() {
        let mut indexer = FakeIndexer::new(
            Some(1),
            vec![ObjectsPage::new(
                vec![("0xTreasury", "900"), ("0xa", "30"), ("0xb", "10")],
                false,
                None,
            )],
        );
        let report = take_snapshot(&mut indexer, &airdrop("4", "0xtreasury, 0xnobody"))
            .await
            .unwrap();
        assert_eq!(
            report.render(),
            "rank,address,balance,airdrop_amount\n1,0xTreasury,90,0\n2,0xa,3,3\n3,0xb,1,1\n"
        );
    }

    #[tokio::test]
    async fn everyone_excluded() {
        let mut indexer = FakeIndexer::new(
            Some(0),
            vec![ObjectsPage::new(vec![("0xa", "5")], false, None)],
        );
        let result = take_snapshot(&mut indexer, &airdrop("1", "0xA")).await;
        assert!(matches!(result, Err(SnapshotError::NoEligibleHolders)));
    }

    #[tokio::test]
    async fn precision_checked_before_paging() {
        let mut indexer = FakeIndexer::new(
            Some(2),
            vec![ObjectsPage::new(vec![("0xa", "5")], false, None)],
        );
        let result = take_snapshot(&mut indexer, &airdrop("1.2345", "")).await;
        assert!(matches!(
            result,
            Err(SnapshotError::PrecisionOverflow { decimals: 2, .. })
        ));
        assert_eq!(indexer.pages_requested, 0);
    }
}
