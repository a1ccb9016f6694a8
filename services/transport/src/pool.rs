//! A chain's pool of RPC endpoints and healthiest-first selection.

use crate::endpoint::{Endpoint, EndpointKind};

pub struct EndpointPool {
    pub chain_id: u64,
    endpoints: Vec<Endpoint>,
}

impl EndpointPool {
    pub fn new(chain_id: u64, https: Vec<String>, wss: Vec<String>) -> Self {
        let mut endpoints = Vec::with_capacity(https.len() + wss.len());
        endpoints.extend(https.into_iter().map(|u| Endpoint::new(u, EndpointKind::Https)));
        endpoints.extend(wss.into_iter().map(|u| Endpoint::new(u, EndpointKind::Ws)));
        Self { chain_id, endpoints }
    }

    /// Lowest-cost selectable endpoint of the given kind, or `None` if every
    /// endpoint of that kind is currently quarantined.
    pub fn pick(&self, kind: EndpointKind) -> Option<&Endpoint> {
        self.endpoints
            .iter()
            .filter(|e| e.kind == kind && e.may_select())
            .min_by(|a, b| a.health_cost().partial_cmp(&b.health_cost()).unwrap())
    }

    /// Up to `k` distinct selectable endpoints of the given kind, ranked by
    /// health cost — used by `quorumCall`.
    pub fn pick_n(&self, kind: EndpointKind, k: usize) -> Vec<&Endpoint> {
        let mut candidates: Vec<&Endpoint> = self
            .endpoints
            .iter()
            .filter(|e| e.kind == kind && e.may_select())
            .collect();
        candidates.sort_by(|a, b| a.health_cost().partial_cmp(&b.health_cost()).unwrap());
        candidates.truncate(k);
        candidates
    }

    pub fn healthy_count(&self, kind: EndpointKind) -> usize {
        self.endpoints
            .iter()
            .filter(|e| e.kind == kind && e.may_select())
            .count()
    }

    pub fn all(&self) -> &[Endpoint] {
        &self.endpoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_lowest_cost_endpoint() {
        let pool = EndpointPool::new(56, vec!["https://a".into(), "https://b".into()], vec![]);
        pool.all()[0].record_success(500.0);
        pool.all()[1].record_success(50.0);
        let picked = pool.pick(EndpointKind::Https).unwrap();
        assert_eq!(picked.url, "https://b");
    }

    #[test]
    fn quarantined_endpoint_is_excluded_from_pick() {
        let pool = EndpointPool::new(56, vec!["https://a".into(), "https://b".into()], vec![]);
        for _ in 0..5 {
            pool.all()[1].record_failure();
        }
        let picked = pool.pick(EndpointKind::Https).unwrap();
        assert_eq!(picked.url, "https://a");
    }
}
