//! Strip (scheduled order instance) model.
//!
//! A strip is one order scheduled on one line during a time window.
//! The board source duplicates the quantity into nested order-detail
//! fields read by legacy renderers. Here `Strip::quantity` is the only
//! stored value; the duplicates are derived on encode
//! (see [`Strip::legacy_quantities`]).
//!
//! # Wire Shape
//!
//! ```json
//! {
//!   "stripId": 7,
//!   "startDate": "2025-02-01T08:00:00",
//!   "endDate": "2025-02-02T08:00:00",
//!   "quantity": 100,
//!   "stripOffSetWithCell": 10,
//!   "stripDetails": { "stripWidth": 20, "cssStyles": { "bgColour": "#f1f5f9", "border": "1px solid #cbd5e1" } },
//!   "orderDetails": { "quantity": 100, "ocDetails": { "buyerShortName": "ACME", "units": 100 } }
//! }
//! ```
//!
//! Fields the board does not interpret are carried through unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::quantity;
use super::StripId;

/// One order instance scheduled on a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StripRecord", into = "StripRecord")]
pub struct Strip {
    /// Unique strip identifier. Negative = temporary (split product).
    pub strip_id: StripId,
    /// Window start (opaque date-time text).
    pub start_date: Option<String>,
    /// Window end (opaque date-time text).
    pub end_date: Option<String>,
    /// Unit count. Single source of truth for all quantity fields.
    pub quantity: u64,
    /// Presentation-only placement and styling.
    pub layout: StripLayout,
    /// Descriptive order payload (buyer, reference, picture).
    pub order_details: OrderDetails,
    /// Originating parent for strips produced by a split.
    pub parent_strip_id: Option<StripId>,
    /// Unrecognized top-level fields, preserved verbatim.
    pub extra: Map<String, Value>,
}

/// Presentation-only placement and styling of a strip.
///
/// The mutation engine updates these heuristically to keep the board
/// plausible. They carry no scheduling meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StripLayout {
    /// Horizontal offset within the line cell (percent).
    pub offset: Option<f64>,
    /// Visual width (percent).
    pub width: Option<f64>,
    /// Background colour.
    pub background: Option<String>,
    /// CSS border shorthand, e.g. `1px solid #86efac`.
    pub border: Option<String>,
    /// Unrecognized `cssStyles` fields.
    pub css_extra: Map<String, Value>,
    /// Unrecognized `stripDetails` fields.
    pub details_extra: Map<String, Value>,
    form: NumberForm,
}

/// Whether offset and width arrived as JSON integers. Whole values are
/// re-encoded the same way; anything else encodes as a float.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct NumberForm {
    offset_integer: bool,
    width_integer: bool,
}

/// Descriptive order payload. Opaque to the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDetails {
    /// Short buyer label shown on the strip header.
    pub buyer_short_name: Option<String>,
    /// Order reference text.
    pub order_reference_number: Option<String>,
    /// Picture reference.
    pub pic_file_name: Option<String>,
    /// Unrecognized `orderDetails` fields.
    pub extra: Map<String, Value>,
    /// Unrecognized `orderDetails.ocDetails` fields.
    pub oc_extra: Map<String, Value>,
}

/// Quantity copies expected by legacy consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyQuantities {
    /// `quantity` at strip level.
    pub strip: u64,
    /// `orderDetails.quantity`.
    pub order_details: u64,
    /// `orderDetails.ocDetails.units`.
    pub oc_units: u64,
}

impl Strip {
    /// Creates a strip with the given id and quantity.
    pub fn new(strip_id: impl Into<StripId>, quantity: u64) -> Self {
        Self {
            strip_id: strip_id.into(),
            start_date: None,
            end_date: None,
            quantity,
            layout: StripLayout::default(),
            order_details: OrderDetails::default(),
            parent_strip_id: None,
            extra: Map::new(),
        }
    }

    /// Sets the schedule window.
    pub fn with_window(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }

    /// Sets the layout.
    pub fn with_layout(mut self, layout: StripLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the buyer label.
    pub fn with_buyer(mut self, buyer: impl Into<String>) -> Self {
        self.order_details.buyer_short_name = Some(buyer.into());
        self
    }

    /// Sets the order reference text.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.order_details.order_reference_number = Some(reference.into());
        self
    }

    /// Quantity as legacy consumers read it. All copies derive from
    /// [`Strip::quantity`], so they can never disagree.
    pub fn legacy_quantities(&self) -> LegacyQuantities {
        LegacyQuantities {
            strip: self.quantity,
            order_details: self.quantity,
            oc_units: self.quantity,
        }
    }

    /// Buyer label, or `Unassigned`.
    pub fn buyer_label(&self) -> &str {
        self.order_details
            .buyer_short_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("Unassigned")
    }
}

impl StripLayout {
    /// Creates a layout at the given offset and width.
    pub fn new(offset: f64, width: f64) -> Self {
        Self {
            offset: Some(offset),
            width: Some(width),
            ..Default::default()
        }
    }

    /// Sets background and border styling.
    pub fn with_style(mut self, background: impl Into<String>, border: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self.border = Some(border.into());
        self
    }

    /// Border colour: third token of the border shorthand.
    pub fn border_colour(&self) -> Option<&str> {
        self.border.as_deref()?.split(' ').nth(2)
    }

    fn has_details(&self) -> bool {
        self.width.is_some() || self.has_css() || !self.details_extra.is_empty()
    }

    fn has_css(&self) -> bool {
        self.background.is_some() || self.border.is_some() || !self.css_extra.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Wire records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StripRecord {
    strip_id: StripId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_date: Option<String>,
    #[serde(
        default,
        deserialize_with = "quantity::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    quantity: Option<u64>,
    #[serde(
        rename = "stripOffSetWithCell",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    offset: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    strip_details: Option<StripDetailsRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order_details: Option<OrderDetailsRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_strip_id: Option<StripId>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StripDetailsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    strip_width: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    css_styles: Option<CssStylesRecord>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CssStylesRecord {
    #[serde(rename = "bgColour", default, skip_serializing_if = "Option::is_none")]
    background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    border: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderDetailsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quantity: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    oc_details: Option<OcDetailsRecord>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OcDetailsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    buyer_short_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order_reference_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pic_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    units: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<StripRecord> for Strip {
    fn from(record: StripRecord) -> Self {
        let order = record.order_details.unwrap_or_default();
        let oc = order.oc_details.unwrap_or_default();

        // Top-level quantity is authoritative; nested copies only fill a gap.
        let quantity = record
            .quantity
            .or_else(|| order.quantity.as_ref().and_then(quantity::from_value))
            .or_else(|| oc.units.as_ref().and_then(quantity::from_value))
            .unwrap_or(0);

        let details = record.strip_details.unwrap_or_default();
        let css = details.css_styles.unwrap_or_default();
        let (offset, offset_integer) = decode_measure(record.offset);
        let (width, width_integer) = decode_measure(details.strip_width);

        Self {
            strip_id: record.strip_id,
            start_date: record.start_date,
            end_date: record.end_date,
            quantity,
            layout: StripLayout {
                offset,
                width,
                background: css.background,
                border: css.border,
                css_extra: css.extra,
                details_extra: details.extra,
                form: NumberForm {
                    offset_integer,
                    width_integer,
                },
            },
            order_details: OrderDetails {
                buyer_short_name: oc.buyer_short_name,
                order_reference_number: oc.order_reference_number,
                pic_file_name: oc.pic_file_name,
                extra: order.extra,
                oc_extra: oc.extra,
            },
            parent_strip_id: record.parent_strip_id,
            extra: record.extra,
        }
    }
}

impl From<Strip> for StripRecord {
    fn from(strip: Strip) -> Self {
        let legacy = strip.legacy_quantities();
        let layout = strip.layout;

        let strip_details = layout.has_details().then(|| {
            let css_styles = layout.has_css().then(|| CssStylesRecord {
                background: layout.background.clone(),
                border: layout.border.clone(),
                extra: layout.css_extra.clone(),
            });
            StripDetailsRecord {
                strip_width: encode_measure(layout.width, layout.form.width_integer),
                css_styles,
                extra: layout.details_extra.clone(),
            }
        });

        let details = strip.order_details;
        Self {
            strip_id: strip.strip_id,
            start_date: strip.start_date,
            end_date: strip.end_date,
            quantity: Some(legacy.strip),
            offset: encode_measure(layout.offset, layout.form.offset_integer),
            strip_details,
            order_details: Some(OrderDetailsRecord {
                quantity: Some(Value::from(legacy.order_details)),
                oc_details: Some(OcDetailsRecord {
                    buyer_short_name: details.buyer_short_name,
                    order_reference_number: details.order_reference_number,
                    pic_file_name: details.pic_file_name,
                    units: Some(Value::from(legacy.oc_units)),
                    extra: details.oc_extra,
                }),
                extra: details.extra,
            }),
            parent_strip_id: strip.parent_strip_id,
            extra: strip.extra,
        }
    }
}

/// Largest integer an f64 holds exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn decode_measure(raw: Option<Number>) -> (Option<f64>, bool) {
    match raw {
        Some(n) => (n.as_f64(), !n.is_f64()),
        None => (None, false),
    }
}

fn encode_measure(value: Option<f64>, integer: bool) -> Option<Number> {
    let value = value?;
    if integer && value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        return Some(Number::from(value as i64));
    }
    Number::from_f64(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source_strip() -> Value {
        json!({
            "stripId": 7,
            "startDate": "2025-02-01T08:00:00",
            "endDate": "2025-02-02T08:00:00",
            "quantity": 100,
            "stripOffSetWithCell": 10,
            "stripDetails": {
                "stripWidth": 20,
                "cssStyles": { "bgColour": "#f1f5f9", "border": "1px solid #cbd5e1", "textColour": "#0f172a" },
                "cellSpan": 3
            },
            "orderDetails": {
                "quantity": 100,
                "style": "polo",
                "ocDetails": {
                    "buyerShortName": "ACME",
                    "orderReferenceNumber": "PO-1",
                    "picFileName": "",
                    "units": 100,
                    "season": "SS25"
                }
            },
            "smv": 12.5
        })
    }

    #[test]
    fn test_decode_source_shape() {
        let strip: Strip = serde_json::from_value(source_strip()).unwrap();
        assert_eq!(strip.strip_id, StripId(7));
        assert_eq!(strip.quantity, 100);
        assert_eq!(strip.layout.offset, Some(10.0));
        assert_eq!(strip.layout.width, Some(20.0));
        assert_eq!(strip.layout.border_colour(), Some("#cbd5e1"));
        assert_eq!(strip.buyer_label(), "ACME");
        assert_eq!(strip.extra.get("smv"), Some(&json!(12.5)));
        assert_eq!(strip.order_details.oc_extra.get("season"), Some(&json!("SS25")));
    }

    #[test]
    fn test_encode_derives_nested_quantities() {
        let mut strip: Strip = serde_json::from_value(source_strip()).unwrap();
        strip.quantity = 40;

        let v = serde_json::to_value(&strip).unwrap();
        assert_eq!(v["quantity"], json!(40));
        assert_eq!(v["orderDetails"]["quantity"], json!(40));
        assert_eq!(v["orderDetails"]["ocDetails"]["units"], json!(40));
        assert_eq!(v["orderDetails"]["style"], json!("polo"));
        assert_eq!(v["stripDetails"]["cellSpan"], json!(3));
    }

    #[test]
    fn test_source_shape_roundtrips_exactly() {
        let strip: Strip = serde_json::from_value(source_strip()).unwrap();
        assert_eq!(strip.layout.css_extra.get("textColour"), Some(&json!("#0f172a")));

        let v = serde_json::to_value(&strip).unwrap();
        assert_eq!(v, source_strip());
        assert!(v["stripOffSetWithCell"].is_u64());
        assert!(v["stripDetails"]["stripWidth"].is_u64());
    }

    #[test]
    fn test_float_measures_stay_floats() {
        let mut raw = source_strip();
        raw["stripOffSetWithCell"] = json!(10.0);
        raw["stripDetails"]["stripWidth"] = json!(20.5);
        let strip: Strip = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&strip).unwrap(), raw);
    }

    #[test]
    fn test_changed_measures_keep_source_form() {
        let mut strip: Strip = serde_json::from_value(source_strip()).unwrap();
        strip.layout.offset = Some(5.0);
        strip.layout.width = Some(20.0 * 0.6 + 0.5);
        let v = serde_json::to_value(&strip).unwrap();
        assert_eq!(v["stripOffSetWithCell"], json!(5));
        assert!(v["stripDetails"]["stripWidth"].is_f64());
    }

    #[test]
    fn test_css_extra_alone_keeps_css_styles() {
        let mut layout = StripLayout::default();
        layout.css_extra.insert("opacity".into(), json!(0.5));
        let v = serde_json::to_value(Strip::new(1, 1).with_layout(layout)).unwrap();
        assert_eq!(v["stripDetails"]["cssStyles"], json!({"opacity": 0.5}));
    }

    #[test]
    fn test_loosely_typed_quantities() {
        let strip: Strip = serde_json::from_value(json!({"stripId": 1, "quantity": "25"})).unwrap();
        assert_eq!(strip.quantity, 25);
        let strip: Strip = serde_json::from_value(json!({"stripId": 1, "quantity": 25.0})).unwrap();
        assert_eq!(strip.quantity, 25);
        let strip: Strip = serde_json::from_value(json!({
            "stripId": 1,
            "orderDetails": { "quantity": "9" }
        }))
        .unwrap();
        assert_eq!(strip.quantity, 9);
        assert!(serde_json::from_value::<Strip>(json!({"stripId": 1, "quantity": 2.5})).is_err());
    }

    #[test]
    fn test_top_level_quantity_wins() {
        let strip: Strip = serde_json::from_value(json!({
            "stripId": 1,
            "quantity": 5,
            "orderDetails": { "quantity": 9, "ocDetails": { "units": 11 } }
        }))
        .unwrap();
        assert_eq!(strip.quantity, 5);
        assert_eq!(strip.legacy_quantities().oc_units, 5);
    }

    #[test]
    fn test_nested_quantity_fills_gap() {
        let strip: Strip = serde_json::from_value(json!({
            "stripId": 1,
            "orderDetails": { "ocDetails": { "units": 11 } }
        }))
        .unwrap();
        assert_eq!(strip.quantity, 11);
    }

    #[test]
    fn test_unassigned_buyer_label() {
        assert_eq!(Strip::new(1, 10).buyer_label(), "Unassigned");
        assert_eq!(Strip::new(1, 10).with_buyer("").buyer_label(), "Unassigned");
    }

    #[test]
    fn test_minimal_strip_omits_layout() {
        let v = serde_json::to_value(Strip::new(3, 1)).unwrap();
        assert!(v.get("stripDetails").is_none());
        assert!(v.get("parentStripId").is_none());
    }
}
