use studiobench_core::{Competitor, Tier};

/// Narrows the competitor list. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompetitorFilter {
    /// Case-insensitive substring of name, city or address.
    pub search: Option<String>,
    pub tier: Option<Tier>,
    /// Case-insensitive substring of the segment.
    pub segment: Option<String>,
}

impl CompetitorFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        needle(self.search.as_deref()).is_none()
            && self.tier.is_none()
            && needle(self.segment.as_deref()).is_none()
    }

    #[must_use]
    pub fn matches(&self, competitor: &Competitor) -> bool {
        if let Some(search) = needle(self.search.as_deref()) {
            let hit = [
                Some(competitor.display_name()),
                competitor.city.as_deref(),
                competitor.address.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&search));
            if !hit {
                return false;
            }
        }

        if let Some(tier) = self.tier {
            if competitor.tier != Some(tier) {
                return false;
            }
        }

        if let Some(segment) = needle(self.segment.as_deref()) {
            let own = competitor
                .segment
                .as_deref()
                .unwrap_or_default()
                .to_lowercase();
            if !own.contains(&segment) {
                return false;
            }
        }

        true
    }

    pub fn apply<'a>(&'a self, competitors: &'a [Competitor]) -> impl Iterator<Item = &'a Competitor> + 'a {
        competitors.iter().filter(move |c| self.matches(c))
    }
}

fn needle(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}
