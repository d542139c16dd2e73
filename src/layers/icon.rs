use crate::core::geo::Point;
use crate::dom::element::Element;

/// Result of asking an icon definition for an element.
///
/// `reused` makes the reuse-or-replace decision explicit: when true the
/// returned element is the previous instance restyled in place, and the
/// caller must not detach it; when false the caller owns detaching the old
/// element before attaching the new one.
pub struct IconElement {
    pub element: Element,
    pub reused: bool,
}

/// An icon definition a marker renders itself with.
///
/// Definitions are pure factories: they create (or restyle) elements on
/// demand and expose static anchor metadata. The marker owns the produced
/// elements and their lifecycle.
pub trait Icon {
    /// Creates the icon element, optionally reusing the previous instance
    fn create_icon(&self, previous: Option<&Element>) -> IconElement;

    /// Creates the paired shadow element, if this icon has one
    fn create_shadow(&self, _previous: Option<&Element>) -> Option<IconElement> {
        None
    }

    /// Pixel offset from the element's top-left corner to the anchored
    /// geographic coordinate
    fn anchor(&self) -> Point {
        Point::default()
    }

    /// Anchor for the shadow element
    fn shadow_anchor(&self) -> Point {
        self.anchor()
    }

    /// Offset a bound popup opens at, relative to the anchor
    fn popup_anchor(&self) -> Point {
        Point::default()
    }
}

/// The default image-based marker icon, with an optional shadow image.
#[derive(Debug, Clone)]
pub struct PinIcon {
    pub icon_url: String,
    pub icon_size: Point,
    pub icon_anchor: Point,
    pub shadow_url: Option<String>,
    pub shadow_size: Point,
    pub popup_anchor: Point,
}

impl PinIcon {
    pub fn new(icon_url: &str) -> Self {
        Self {
            icon_url: icon_url.to_string(),
            icon_size: Point::new(25.0, 41.0),
            icon_anchor: Point::new(12.0, 41.0),
            shadow_url: None,
            shadow_size: Point::new(41.0, 41.0),
            popup_anchor: Point::new(1.0, -34.0),
        }
    }

    pub fn with_size(mut self, size: Point, anchor: Point) -> Self {
        self.icon_size = size;
        self.icon_anchor = anchor;
        self
    }

    pub fn with_shadow(mut self, shadow_url: &str, shadow_size: Point) -> Self {
        self.shadow_url = Some(shadow_url.to_string());
        self.shadow_size = shadow_size;
        self
    }

    fn styled(&self, element: &Element, url: &str, size: Point) {
        element.set_attribute("src", url);
        element.set_size(size);
    }
}

impl Default for PinIcon {
    fn default() -> Self {
        Self::new("marker-icon.png")
    }
}

impl Icon for PinIcon {
    fn create_icon(&self, previous: Option<&Element>) -> IconElement {
        // A previous image element can be restyled in place
        if let Some(previous) = previous.filter(|e| e.tag() == "img") {
            self.styled(previous, &self.icon_url, self.icon_size);
            return IconElement {
                element: previous.clone(),
                reused: true,
            };
        }

        let element = Element::new("img");
        self.styled(&element, &self.icon_url, self.icon_size);
        IconElement {
            element,
            reused: false,
        }
    }

    fn create_shadow(&self, previous: Option<&Element>) -> Option<IconElement> {
        let url = self.shadow_url.as_ref()?;

        if let Some(previous) = previous.filter(|e| e.tag() == "img") {
            self.styled(previous, url, self.shadow_size);
            return Some(IconElement {
                element: previous.clone(),
                reused: true,
            });
        }

        let element = Element::new("img");
        self.styled(&element, url, self.shadow_size);
        Some(IconElement {
            element,
            reused: false,
        })
    }

    fn anchor(&self) -> Point {
        self.icon_anchor
    }

    fn popup_anchor(&self) -> Point {
        self.popup_anchor
    }
}

/// A lightweight icon rendered as a plain container element with an HTML
/// payload instead of an image. Has no shadow.
#[derive(Debug, Clone)]
pub struct HtmlIcon {
    pub html: String,
    pub icon_size: Point,
    pub icon_anchor: Point,
}

impl HtmlIcon {
    pub fn new(html: &str) -> Self {
        Self {
            html: html.to_string(),
            icon_size: Point::new(12.0, 12.0),
            icon_anchor: Point::new(6.0, 6.0),
        }
    }

    pub fn with_size(mut self, size: Point, anchor: Point) -> Self {
        self.icon_size = size;
        self.icon_anchor = anchor;
        self
    }
}

impl Icon for HtmlIcon {
    fn create_icon(&self, previous: Option<&Element>) -> IconElement {
        if let Some(previous) = previous.filter(|e| e.tag() == "div") {
            previous.set_attribute("html", &self.html);
            previous.set_size(self.icon_size);
            return IconElement {
                element: previous.clone(),
                reused: true,
            };
        }

        let element = Element::new("div");
        element.set_attribute("html", &self.html);
        element.set_size(self.icon_size);
        IconElement {
            element,
            reused: false,
        }
    }

    fn anchor(&self) -> Point {
        self.icon_anchor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_icon_reuses_image_elements() {
        let icon = PinIcon::new("a.png");
        let first = icon.create_icon(None);
        assert!(!first.reused);
        assert_eq!(first.element.attribute("src").as_deref(), Some("a.png"));

        let replacement = PinIcon::new("b.png");
        let second = replacement.create_icon(Some(&first.element));
        assert!(second.reused);
        assert_eq!(second.element, first.element);
        assert_eq!(second.element.attribute("src").as_deref(), Some("b.png"));
    }

    #[test]
    fn test_pin_icon_does_not_reuse_foreign_tags() {
        let html = HtmlIcon::new("<b>x</b>");
        let div = html.create_icon(None);

        let pin = PinIcon::new("a.png");
        let img = pin.create_icon(Some(&div.element));
        assert!(!img.reused);
        assert_ne!(img.element, div.element);
    }

    #[test]
    fn test_shadow_only_when_configured() {
        let plain = PinIcon::new("a.png");
        assert!(plain.create_shadow(None).is_none());

        let shadowed = PinIcon::new("a.png").with_shadow("a-shadow.png", Point::new(41.0, 41.0));
        let shadow = shadowed.create_shadow(None).unwrap();
        assert_eq!(
            shadow.element.attribute("src").as_deref(),
            Some("a-shadow.png")
        );
    }
}
