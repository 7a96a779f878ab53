use std::collections::HashSet;

/// Addresses left out of an airdrop. Matching ignores ASCII case.
#[derive(Debug, Default, Clone)]
pub struct HolderEligibility {
    excluded_addresses: HashSet<String>,
}

impl HolderEligibility {
    /// Parses a comma separated list, empty entries are ignored.
    pub fn from_list(list: &str) -> Self {
        let mut eligibility = Self::default();
        list.split(',')
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .for_each(|address| eligibility.exclude(address));
        eligibility
    }

    pub fn exclude(&mut self, address: &str) {
        self.excluded_addresses.insert(address.to_ascii_lowercase());
    }

    pub fn is_excluded(&self, address: &str) -> bool {
        self.excluded_addresses
            .contains(&address.to_ascii_lowercase())
    }

    pub fn is_eligible(&self, address: &str) -> bool {
        !self.is_excluded(address)
    }

    pub fn excluded_addresses(&self) -> impl Iterator<Item = &String> {
        self.excluded_addresses.iter()
    }

    pub fn total_excluded_addresses(&self) -> usize {
        self.excluded_addresses.len()
    }
}
