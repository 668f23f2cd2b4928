use crate::{
    core::constants::{DELIVER_PAGE, TAKE_DELIVERY_PAGE},
    data::delivery::{Delivery, DeliveryId, Endpoint},
};
use serde::Serialize;

/// Link to a backend-owned delivery page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ActionLink {
    Take(DeliveryId),
    Deliver(DeliveryId),
}

impl ActionLink {
    pub fn href(&self) -> String {
        match self {
            ActionLink::Take(id) => format!("{}?id={}", TAKE_DELIVERY_PAGE, id),
            ActionLink::Deliver(id) => format!("{}?id={}", DELIVER_PAGE, id),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActionLink::Take(_) => "take delivery",
            ActionLink::Deliver(_) => "deliver",
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            "<div><a href=\"{}\">{}</a></div>",
            escape_html(&self.href()),
            self.label()
        )
    }
}

/// Text shown when a marker is opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupContent {
    pub text: String,
    pub link: Option<ActionLink>,
}

impl PopupContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: None,
        }
    }

    pub fn with_link(mut self, link: ActionLink) -> Self {
        self.link = Some(link);
        self
    }

    /// Popup for one end of a delivery, naming the other end
    pub fn for_endpoint(delivery: &Delivery, endpoint: Endpoint, link: ActionLink) -> Self {
        let text = match endpoint {
            Endpoint::From => format!("from here to {}", delivery.display_text(Endpoint::To)),
            Endpoint::To => format!("from {} to here", delivery.display_text(Endpoint::From)),
        };
        Self::new(text).with_link(link)
    }

    pub fn for_self_position(accuracy: f64) -> Self {
        Self::new(format!("you are {} meters from here", accuracy / 2.0))
    }

    pub fn to_html(&self) -> String {
        let mut html = escape_html(&self.text);
        if let Some(link) = &self.link {
            html.push_str(&link.to_html());
        }
        html
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;

    fn delivery() -> Delivery {
        Delivery::new("42", LatLng::new(32.07, 34.80), LatLng::new(32.08, 34.81))
    }

    #[test]
    fn test_links() {
        let id = DeliveryId::from("42");
        assert_eq!(ActionLink::Take(id.clone()).href(), "delivery?id=42");
        assert_eq!(ActionLink::Deliver(id.clone()).href(), "deliver?id=42");
        assert_eq!(
            ActionLink::Take(id).to_html(),
            "<div><a href=\"delivery?id=42\">take delivery</a></div>"
        );
    }

    #[test]
    fn test_endpoint_text_uses_coordinates_without_addresses() {
        let link = ActionLink::Take(DeliveryId::from("42"));
        let origin = PopupContent::for_endpoint(&delivery(), Endpoint::From, link.clone());
        assert_eq!(origin.text, "from here to 32.08,34.81");

        let destination = PopupContent::for_endpoint(&delivery(), Endpoint::To, link);
        assert_eq!(destination.text, "from 32.07,34.8 to here");
    }

    #[test]
    fn test_addresses_are_escaped_in_html() {
        let delivery = delivery().with_addresses(None, Some("Bar & <Grill>".to_string()));
        let popup = PopupContent::for_endpoint(
            &delivery,
            Endpoint::From,
            ActionLink::Take(delivery.id.clone()),
        );
        assert_eq!(popup.text, "from here to Bar & <Grill>");
        assert!(popup.to_html().starts_with("from here to Bar &amp; &lt;Grill&gt;<div>"));
    }

    #[test]
    fn test_self_position_halves_accuracy() {
        assert_eq!(
            PopupContent::for_self_position(30.0).text,
            "you are 15 meters from here"
        );
    }
}
