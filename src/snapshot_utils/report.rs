use crate::snapshot_utils::allocation::AllocationMap;
use crate::units::to_display;
use itertools::Itertools;
use num_bigint::BigUint;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolderRow {
    pub address: String,
    pub raw_balance: BigUint,
}

impl HolderRow {
    pub fn new(address: &str, raw_balance: BigUint) -> Self {
        Self {
            address: address.to_string(),
            raw_balance,
        }
    }
}

/// Largest balance first, equal balances ordered by address.
pub fn rank_rows(rows: Vec<HolderRow>) -> Vec<HolderRow> {
    rows.into_iter()
        .sorted_by(|a, b| {
            b.raw_balance
                .cmp(&a.raw_balance)
                .then_with(|| a.address.cmp(&b.address))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub rank: usize,
    pub address: String,
    pub balance: String,
    pub airdrop_amount: Option<String>,
}

impl ToString for ReportRow {
    fn to_string(&self) -> String {
        match &self.airdrop_amount {
            Some(amount) => format!(
                "{},{},{},{}",
                self.rank, self.address, self.balance, amount
            ),
            None => format!("{},{},{}", self.rank, self.address, self.balance),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    rows: Vec<ReportRow>,
    with_allocation: bool,
    total_raw_balance: BigUint,
}

impl Report {
    pub fn header(&self) -> &'static str {
        if self.with_allocation {
            "rank,address,balance,airdrop_amount"
        } else {
            "rank,address,balance"
        }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn total_raw_balance(&self) -> &BigUint {
        &self.total_raw_balance
    }

    pub fn render(&self) -> String {
        let mut out = format!("{}\n", self.header());
        for row in self.rows.iter() {
            out.push_str(&row.to_string());
            out.push('\n');
        }
        out
    }

    pub fn dump_to_file(&self, path: PathBuf) -> anyhow::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

pub fn build_report(
    rows: Vec<HolderRow>,
    decimals: u32,
    allocation: Option<&AllocationMap>,
) -> Report {
    let total_raw_balance: BigUint = rows.iter().map(|row| &row.raw_balance).sum();
    let rows = rank_rows(rows)
        .into_iter()
        .enumerate()
        .map(|(index, row)| ReportRow {
            rank: index + 1,
            balance: to_display(&row.raw_balance, decimals),
            airdrop_amount: allocation.map(|allocation| {
                allocation
                    .get(&row.address)
                    .map(|amount| to_display(amount, decimals))
                    .unwrap_or_else(|| String::from("0"))
            }),
            address: row.address,
        })
        .collect();

    Report {
        rows,
        with_allocation: allocation.is_some(),
        total_raw_balance,
    }
}
