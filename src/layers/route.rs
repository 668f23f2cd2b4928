use crate::{
    core::config::RouteOverlayPolicy,
    data::delivery::{Delivery, DeliveryId},
    layers::vector::{LineStyle, Polyline},
};
use std::collections::VecDeque;

/// Draws delivery routes as dashed polylines on top of the markers
pub struct RouteHighlighter {
    overlays: VecDeque<Polyline>,
    policy: RouteOverlayPolicy,
    style: LineStyle,
    drawn: u64,
}

impl RouteHighlighter {
    pub fn new(policy: RouteOverlayPolicy) -> Self {
        Self {
            overlays: VecDeque::new(),
            policy,
            style: LineStyle::route(),
            drawn: 0,
        }
    }

    pub fn policy(&self) -> RouteOverlayPolicy {
        self.policy
    }

    /// Adds an overlay for the delivery's path. Paths with fewer than two
    /// points draw nothing.
    pub fn highlight_route(&mut self, delivery: &Delivery) -> Option<&Polyline> {
        if delivery.path.len() < 2 {
            log::debug!(
                "Delivery {} has no route to draw ({} points)",
                delivery.id,
                delivery.path.len()
            );
            return None;
        }

        if self.policy == RouteOverlayPolicy::ReplacePrevious {
            self.overlays.clear();
        }

        self.drawn += 1;
        let line = Polyline::new(
            format!("route_{}_{}", delivery.id, self.drawn),
            delivery.path.clone(),
            self.style.clone(),
        )
        .for_delivery(delivery.id.clone());
        self.overlays.push_back(line);
        self.enforce_cap();

        self.overlays.back()
    }

    fn enforce_cap(&mut self) {
        let cap = match self.policy {
            RouteOverlayPolicy::Accumulate { max_overlays } => max_overlays,
            RouteOverlayPolicy::ReplacePrevious => 1,
        };
        while self.overlays.len() > cap {
            self.overlays.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.overlays.clear();
    }

    /// Overlays from oldest to newest
    pub fn overlays(&self) -> impl Iterator<Item = &Polyline> {
        self.overlays.iter()
    }

    pub fn is_highlighted(&self, delivery_id: &DeliveryId) -> bool {
        self.overlays
            .iter()
            .any(|line| line.delivery_id() == Some(delivery_id))
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }
}

impl Default for RouteHighlighter {
    fn default() -> Self {
        Self::new(RouteOverlayPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;

    fn routed(id: &str) -> Delivery {
        Delivery::new(id, LatLng::new(32.0, 34.0), LatLng::new(32.1, 34.1)).with_path(vec![
            LatLng::new(32.0, 34.0),
            LatLng::new(32.05, 34.02),
            LatLng::new(32.1, 34.1),
        ])
    }

    #[test]
    fn test_highlight_draws_path() {
        let mut routes = RouteHighlighter::default();
        let line = routes.highlight_route(&routed("5")).unwrap();
        assert_eq!(line.points().len(), 3);
        assert_eq!(line.style().dash_array().as_deref(), Some("5, 6, 2, 6"));
        assert!(routes.is_highlighted(&DeliveryId::from("5")));
    }

    #[test]
    fn test_short_path_draws_nothing() {
        let mut routes = RouteHighlighter::default();
        let delivery = Delivery::new("1", LatLng::new(32.0, 34.0), LatLng::new(32.1, 34.1))
            .with_path(vec![LatLng::new(32.0, 34.0)]);
        assert!(routes.highlight_route(&delivery).is_none());
        assert!(routes.is_empty());
    }

    #[test]
    fn test_accumulate_drops_oldest() {
        let mut routes = RouteHighlighter::new(RouteOverlayPolicy::Accumulate { max_overlays: 2 });
        for id in ["1", "2", "3"] {
            routes.highlight_route(&routed(id));
        }
        assert_eq!(routes.len(), 2);
        assert!(!routes.is_highlighted(&DeliveryId::from("1")));
        assert!(routes.is_highlighted(&DeliveryId::from("3")));
    }

    #[test]
    fn test_replace_previous() {
        let mut routes = RouteHighlighter::new(RouteOverlayPolicy::ReplacePrevious);
        routes.highlight_route(&routed("1"));
        routes.highlight_route(&routed("2"));
        assert_eq!(routes.len(), 1);
        assert!(routes.is_highlighted(&DeliveryId::from("2")));

        routes.clear();
        assert!(routes.is_empty());
    }
}
