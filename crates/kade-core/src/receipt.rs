//! # Receipt Emitter
//!
//! Pure projections of a committed [`SaleRecord`] plus the singleton
//! [`ShopSettings`] into the three receipt formats:
//!
//! - [`print_layout`] - monospace text block for the platform print facility
//! - [`pdf_draw_ops`] - draw instructions for an 80mm receipt-paper PDF,
//!   consumed by the external PDF-generation facility
//! - [`message_text`] - plain-text template for a messaging deep-link
//!   ([`share_link`] attaches the operator-supplied destination contact)
//!
//! None of these mutate store state; all three render from the same
//! canonical sale data.

use serde::{Deserialize, Serialize};

use crate::types::{SaleRecord, ShopSettings};

/// Width of the printable receipt area, in characters.
const PRINT_WIDTH: usize = 32;

/// Receipt paper width for the PDF projection, in millimeters.
pub const RECEIPT_PAGE_WIDTH_MM: f64 = 80.0;

/// Nominal page height for the PDF projection, in millimeters.
pub const RECEIPT_PAGE_HEIGHT_MM: f64 = 200.0;

// =============================================================================
// Print Layout
// =============================================================================

/// Renders the printable on-screen layout handed to the print facility.
pub fn print_layout(sale: &SaleRecord, settings: &ShopSettings) -> String {
    let mut out = String::new();

    out.push_str(&center(&settings.shop_name));
    out.push('\n');
    if !settings.shop_address.is_empty() {
        out.push_str(&center(&settings.shop_address));
        out.push('\n');
    }
    if !settings.shop_phone.is_empty() {
        out.push_str(&center(&format!("Tel: {}", settings.shop_phone)));
        out.push('\n');
    }
    out.push_str(&rule());

    out.push_str(&format!("ID: #{}\n", short_id(&sale.id)));
    out.push_str(&format!("Date: {}\n", sale.date.format("%Y-%m-%d %H:%M")));
    out.push_str(&format!("Customer: {}\n", sale.customer_name));
    out.push_str(&rule());

    for line in &sale.items {
        out.push_str(&two_cols(
            &format!("{} ({})", line.name, line.quantity),
            &format!("{}", line.line_total()),
        ));
    }
    out.push_str(&rule());

    out.push_str(&two_cols("TOTAL:", &format!("{}", sale.total_cents)));
    out.push_str(&two_cols("Cash:", &format!("{}", sale.cash_given_cents)));
    out.push_str(&two_cols("Balance:", &format!("{}", sale.balance_cents)));

    out.push('\n');
    out.push_str(&center("Thank you, come again!"));
    out.push('\n');

    out
}

// =============================================================================
// Message Template
// =============================================================================

/// Renders the plain-text message template: shop name on the first line,
/// then date, customer, line items, and total.
pub fn message_text(sale: &SaleRecord, settings: &ShopSettings) -> String {
    let mut msg = format!("*{}*\n\n", settings.shop_name);
    msg.push_str(&format!("Date: {}\n", sale.date.format("%Y-%m-%d")));
    msg.push_str(&format!("Customer: {}\n", sale.customer_name));
    msg.push_str("------------------------\n");

    for line in &sale.items {
        msg.push_str(&format!(
            "{} x {} = {}\n",
            line.name,
            line.quantity,
            line.line_total()
        ));
    }

    msg.push_str("------------------------\n");
    msg.push_str(&format!("*TOTAL: {}*\n\n", sale.total_cents));
    msg.push_str("Thank you!");
    msg
}

/// Builds the messaging deep-link for the given destination contact.
///
/// The destination number is supplied by the operator at share time; it is
/// never stored with the sale.
pub fn share_link(phone: &str, message: &str) -> String {
    format!("https://wa.me/{}?text={}", phone.trim(), encode_component(message))
}

/// Percent-encodes a URL query component (RFC 3986 unreserved set kept).
fn encode_component(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 3);
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

// =============================================================================
// PDF Draw Instructions
// =============================================================================

/// Horizontal alignment for a PDF text instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One draw instruction for the external PDF facility.
///
/// Coordinates are millimeters on an 80mm-wide page, origin top-left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawOp {
    pub x_mm: f64,
    pub y_mm: f64,
    pub size_pt: f64,
    pub bold: bool,
    pub align: Align,
    pub text: String,
}

/// Renders the compact paged document sized for narrow receipt paper as a
/// sequence of draw instructions.
pub fn pdf_draw_ops(sale: &SaleRecord, settings: &ShopSettings) -> Vec<DrawOp> {
    const LINE_HEIGHT: f64 = 5.0;
    let center_x = RECEIPT_PAGE_WIDTH_MM / 2.0;
    let mut ops = Vec::new();
    let mut y = 10.0;

    let mut text = |x: f64, y: f64, size: f64, bold: bool, align: Align, s: String| {
        ops.push(DrawOp {
            x_mm: x,
            y_mm: y,
            size_pt: size,
            bold,
            align,
            text: s,
        });
    };

    // Header
    text(center_x, y, 14.0, true, Align::Center, settings.shop_name.clone());
    y += LINE_HEIGHT + 2.0;

    if !settings.shop_address.is_empty() {
        text(center_x, y, 10.0, false, Align::Center, settings.shop_address.clone());
        y += LINE_HEIGHT;
    }
    if !settings.shop_phone.is_empty() {
        text(center_x, y, 10.0, false, Align::Center, format!("Tel: {}", settings.shop_phone));
        y += LINE_HEIGHT + 2.0;
    }

    text(center_x, y, 10.0, false, Align::Center, dash_rule());
    y += LINE_HEIGHT;

    // Meta
    text(5.0, y, 9.0, false, Align::Left, format!("Date: {}", sale.date.format("%Y-%m-%d %H:%M")));
    y += LINE_HEIGHT;
    text(5.0, y, 9.0, false, Align::Left, format!("Customer: {}", sale.customer_name));
    y += LINE_HEIGHT;

    text(center_x, y, 10.0, false, Align::Center, dash_rule());
    y += LINE_HEIGHT;

    // Items: name | qty | line total
    for line in &sale.items {
        let name = truncate(&line.name, 20);
        text(5.0, y, 9.0, false, Align::Left, name);
        text(50.0, y, 9.0, false, Align::Right, line.quantity.to_string());
        text(75.0, y, 9.0, false, Align::Right, format!("{}", line.line_total()));
        y += LINE_HEIGHT;
    }

    text(center_x, y, 10.0, false, Align::Center, dash_rule());
    y += LINE_HEIGHT;

    // Totals
    text(5.0, y, 12.0, true, Align::Left, "TOTAL:".to_string());
    text(75.0, y, 12.0, true, Align::Right, format!("{}", sale.total_cents));
    y += LINE_HEIGHT * 2.0;

    text(center_x, y, 10.0, false, Align::Center, "Thank you, come again!".to_string());

    ops
}

/// Date-stamped file name for the saved PDF.
pub fn pdf_filename(sale: &SaleRecord) -> String {
    format!("receipt-{}.pdf", sale.date.timestamp_millis())
}

// =============================================================================
// Helpers
// =============================================================================

/// First 8 characters of a UUID, for compact receipt display.
fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

fn rule() -> String {
    format!("{}\n", "-".repeat(PRINT_WIDTH))
}

fn dash_rule() -> String {
    "-".repeat(42)
}

// Widths count characters, not bytes: shop and item names are not
// guaranteed to be ASCII.
fn center(text: &str) -> String {
    let width = text.chars().count();
    if width >= PRINT_WIDTH {
        return text.to_string();
    }
    let pad = (PRINT_WIDTH - width) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

fn two_cols(left: &str, right: &str) -> String {
    let used = left.chars().count() + right.chars().count();
    if used >= PRINT_WIDTH {
        return format!("{} {}\n", left, right);
    }
    format!("{}{}{}\n", left, " ".repeat(PRINT_WIDTH - used), right)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::SaleLine;
    use chrono::{TimeZone, Utc};

    fn sample_sale() -> SaleRecord {
        SaleRecord {
            id: "3f2c9a10-0000-0000-0000-000000000000".to_string(),
            date: Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap(),
            customer_name: "Cash Customer".to_string(),
            total_cents: Money::from_cents(100000),
            cash_given_cents: Money::from_cents(200000),
            balance_cents: Money::from_cents(100000),
            processed_by: "admin".to_string(),
            items: vec![SaleLine {
                inventory_id: "u1".to_string(),
                name: "T-Shirt".to_string(),
                sku: "TS1".to_string(),
                size: Some("M".to_string()),
                color: None,
                unit_price_cents: Money::from_cents(50000),
                quantity: 2,
            }],
        }
    }

    fn sample_settings() -> ShopSettings {
        ShopSettings {
            shop_name: "Kade Corner".to_string(),
            shop_address: "Galle Road, Colombo".to_string(),
            shop_phone: "011-2345678".to_string(),
            ..ShopSettings::default()
        }
    }

    #[test]
    fn test_print_layout_contains_canonical_fields() {
        let text = print_layout(&sample_sale(), &sample_settings());

        assert!(text.contains("Kade Corner"));
        assert!(text.contains("ID: #3f2c9a10"));
        assert!(text.contains("Customer: Cash Customer"));
        assert!(text.contains("T-Shirt (2)"));
        assert!(text.contains("Rs. 1000.00"));
        assert!(text.contains("Rs. 2000.00"));
        assert!(text.contains("Thank you, come again!"));
    }

    #[test]
    fn test_message_text_shop_name_first_line() {
        let msg = message_text(&sample_sale(), &sample_settings());
        let first = msg.lines().next().unwrap();

        assert_eq!(first, "*Kade Corner*");
        assert!(msg.contains("Date: 2026-08-30"));
        assert!(msg.contains("T-Shirt x 2 = Rs. 1000.00"));
        assert!(msg.contains("*TOTAL: Rs. 1000.00*"));
    }

    #[test]
    fn test_share_link_encodes_message() {
        let link = share_link("94770000000", "Total: Rs. 10.00\nThank you!");
        assert!(link.starts_with("https://wa.me/94770000000?text="));
        assert!(!link.contains(' '));
        assert!(!link.contains('\n'));
        assert!(link.contains("%20"));
        assert!(link.contains("%0A"));
    }

    #[test]
    fn test_print_alignment_counts_chars_not_bytes() {
        let mut settings = sample_settings();
        settings.shop_name = "කඩේ POS".to_string(); // 7 chars, far more bytes

        let mut sale = sample_sale();
        sale.items[0].name = "සාරි".to_string();

        let text = print_layout(&sale, &settings);

        let header = text.lines().next().unwrap();
        let pad = header.chars().take_while(|c| *c == ' ').count();
        assert_eq!(pad, (PRINT_WIDTH - 7) / 2);

        let item_line = text.lines().find(|l| l.contains("සාරි")).unwrap();
        assert_eq!(item_line.chars().count(), PRINT_WIDTH);
    }

    #[test]
    fn test_pdf_ops_header_and_totals() {
        let ops = pdf_draw_ops(&sample_sale(), &sample_settings());

        assert_eq!(ops[0].text, "Kade Corner");
        assert_eq!(ops[0].align, Align::Center);
        assert!(ops[0].bold);

        let total = ops.iter().find(|op| op.text == "TOTAL:").unwrap();
        assert!(total.bold);
        assert!(ops.iter().any(|op| op.text == "Rs. 1000.00"));
    }

    #[test]
    fn test_pdf_truncates_long_names() {
        let mut sale = sample_sale();
        sale.items[0].name = "An Extremely Long Product Name Indeed".to_string();
        let ops = pdf_draw_ops(&sale, &sample_settings());

        assert!(ops.iter().any(|op| op.text.ends_with("...")));
    }

    #[test]
    fn test_pdf_filename_is_date_stamped() {
        let sale = sample_sale();
        assert_eq!(
            pdf_filename(&sale),
            format!("receipt-{}.pdf", sale.date.timestamp_millis())
        );
    }

    #[test]
    fn test_projections_do_not_depend_on_each_other() {
        // All three render from the same canonical sale; rendering one
        // does not disturb the inputs for the others.
        let sale = sample_sale();
        let settings = sample_settings();
        let a = print_layout(&sale, &settings);
        let b = message_text(&sale, &settings);
        let c = pdf_draw_ops(&sale, &settings);
        assert!(!a.is_empty() && !b.is_empty() && !c.is_empty());
        assert_eq!(sale, sample_sale());
    }
}
