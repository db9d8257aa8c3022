//! Static email templates. Every interpolated value is HTML-escaped in the
//! HTML part; the text part is sent as-is.

use html_escape::encode_text;
use serde::{Deserialize, Serialize};

use crate::model::saved_search::SearchFilters;

const BRAND: &str = "Domy v Itálii";

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// One listing as shown in an alert email.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertItem {
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub city: Option<String>,
}

fn layout(heading: &str, inner: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
<h2>{heading}</h2>
{inner}
<p>Best regards,<br>{brand} Team</p>
</div>"#,
        heading = encode_text(heading),
        inner = inner,
        brand = BRAND
    )
}

fn button(url: &str, label: &str) -> String {
    format!(
        r#"<p><a href="{url}" style="background: #007bff; color: white; padding: 10px 20px; text-decoration: none; border-radius: 5px;">{label}</a></p>"#,
        url = html_escape::encode_double_quoted_attribute(url),
        label = encode_text(label)
    )
}

fn paragraphs(text: &str) -> String {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>", encode_text(p).replace('\n', "<br>")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_price(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    if whole < 0 {
        format!("-€{}", grouped)
    } else {
        format!("€{}", grouped)
    }
}

fn criteria_lines(filters: &SearchFilters) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(t) = &filters.property_type {
        lines.push(format!("Type: {}", t));
    }
    if let Some(city) = &filters.city {
        lines.push(format!("City: {}", city));
    }
    if let Some(min) = filters.price_min {
        lines.push(format!("Min Price: {}", format_price(min)));
    }
    if let Some(max) = filters.price_max {
        lines.push(format!("Max Price: {}", format_price(max)));
    }
    if let Some(b) = filters.bedrooms {
        lines.push(format!("Bedrooms: {}+", b));
    }
    if let Some(b) = filters.bathrooms {
        lines.push(format!("Bathrooms: {}+", b));
    }
    lines
}

fn items_text(items: &[AlertItem]) -> String {
    let mut text = String::new();
    for item in items {
        text.push_str(&format!("- {}", item.title));
        if let Some(price) = item.price {
            text.push_str(&format!(" ({})", format_price(price)));
        }
        if let Some(url) = &item.url {
            text.push_str(&format!(" {}", url));
        }
        text.push('\n');
    }
    text
}

fn items_html(items: &[AlertItem]) -> String {
    items
        .iter()
        .map(|item| {
            let title = encode_text(&item.title).to_string();
            let title = match &item.url {
                Some(url) => format!(
                    r#"<a href="{}">{}</a>"#,
                    html_escape::encode_double_quoted_attribute(url),
                    title
                ),
                None => title,
            };
            let mut line = format!("<li>{}", title);
            if let Some(city) = &item.city {
                line.push_str(&format!(" &middot; {}", encode_text(city)));
            }
            if let Some(price) = item.price {
                line.push_str(&format!(" &middot; {}", format_price(price)));
            }
            line.push_str("</li>");
            line
        })
        .collect()
}

pub fn property_alert(
    base_url: &str,
    user_name: &str,
    search_name: &str,
    items: &[AlertItem],
    filters: &SearchFilters,
) -> RenderedEmail {
    let count = items.len();
    let subject = format!("New Properties Found: {} matches your search", count);
    let matches_url = format!("{}/dashboard/recommendations", base_url.trim_end_matches('/'));

    let mut text = format!(
        "Hi {},\n\nWe found {} new properties that match your saved search \"{}\".\n\n",
        user_name, count, search_name
    );
    text.push_str(&items_text(items));
    text.push_str(&format!("\nView your matches at: {}\n\nBest regards,\n{} Team", matches_url, BRAND));

    let criteria = criteria_lines(filters)
        .iter()
        .map(|l| encode_text(l).to_string())
        .collect::<Vec<_>>()
        .join("<br>");
    let list = items_html(items);

    let inner = format!(
        r#"<p>Hi {name},</p>
<p>We found {count} new properties that match your saved search "{search}":</p>
<ul>{list}</ul>
<div style="background: #f5f5f5; padding: 15px; border-radius: 5px; margin: 20px 0;"><strong>Your Search Criteria:</strong><br>{criteria}</div>
{button}"#,
        name = encode_text(user_name),
        count = count,
        search = encode_text(search_name),
        list = list,
        criteria = if criteria.is_empty() { "Any property".to_string() } else { criteria },
        button = button(&matches_url, "View Your Matches"),
    );

    RenderedEmail { subject, text, html: layout("New Properties Found!", &inner) }
}

pub fn inquiry_confirmation(base_url: &str, user_name: &str, property_title: &str, message: &str) -> RenderedEmail {
    let subject = format!("Inquiry Confirmation - {}", property_title);
    let inquiries_url = format!("{}/dashboard/inquiries", base_url.trim_end_matches('/'));
    let text = format!(
        "Hi {},\n\nThank you for your inquiry about \"{}\". We have received your message and will get back to you soon.\n\nYour message: {}\n\nBest regards,\n{} Team",
        user_name, property_title, message, BRAND
    );
    let inner = format!(
        r#"<p>Hi {name},</p>
<p>Thank you for your inquiry about "<strong>{title}</strong>". We have received your message and will get back to you soon.</p>
<div style="background: #f5f5f5; padding: 15px; border-radius: 5px; margin: 20px 0;"><strong>Your Message:</strong><br>{message}</div>
<p>We typically respond within 24 hours. You can track all your inquiries in your dashboard.</p>
{button}"#,
        name = encode_text(user_name),
        title = encode_text(property_title),
        message = encode_text(message),
        button = button(&inquiries_url, "View Your Inquiries"),
    );
    RenderedEmail { subject, text, html: layout("Inquiry Confirmation", &inner) }
}

pub fn welcome(base_url: &str, user_name: &str) -> RenderedEmail {
    let base = base_url.trim_end_matches('/');
    let subject = format!("Welcome to {} - Your Italian Property Journey Begins!", BRAND);
    let text = format!(
        "Welcome {}!\n\nThank you for joining {}, your trusted partner for finding properties in Italy.\n\nGet started: {}/dashboard\n\nBest regards,\n{} Team",
        user_name, BRAND, base, BRAND
    );
    let inner = format!(
        r#"<p>Hi {name},</p>
<p>Thank you for joining <strong>{brand}</strong>, your trusted partner for finding beautiful properties in Italy.</p>
<ul>
<li>Browse our property listings</li>
<li>Save your search preferences and get alerts</li>
<li>Add properties to your favorites</li>
</ul>
{button}"#,
        name = encode_text(user_name),
        brand = BRAND,
        button = button(&format!("{}/dashboard", base), "Go to Your Dashboard"),
    );
    RenderedEmail { subject, text, html: layout(&format!("Welcome to {}!", BRAND), &inner) }
}

pub fn follow_up(base_url: &str, user_name: &str, days_since_registration: u32) -> RenderedEmail {
    let base = base_url.trim_end_matches('/');
    let subject = format!("How's your Italian property search going, {}?", user_name);
    let text = format!(
        "Hi {},\n\nIt's been {} days since you joined {}. How's your property search going?\n\nExplore more: {}/properties\n\nBest regards,\n{} Team",
        user_name, days_since_registration, BRAND, base, BRAND
    );
    let inner = format!(
        r#"<p>Hi {name},</p>
<p>It's been {days} days since you joined {brand}. We hope you're enjoying exploring our Italian properties!</p>
<ul>
<li><strong>Save searches:</strong> set up alerts for properties that match your criteria</li>
<li><strong>Favorite properties:</strong> keep track of properties you love</li>
<li><strong>Explore regions:</strong> discover different areas of Italy</li>
</ul>
{button}"#,
        name = encode_text(user_name),
        days = days_since_registration,
        brand = BRAND,
        button = button(&format!("{}/properties", base), "Continue Your Search"),
    );
    RenderedEmail { subject, text, html: layout("How's your Italian property search going?", &inner) }
}

/// Wrap generated copy in the house layout, keeping the listings and the
/// call to action.
pub fn from_generated_copy(
    subject: String,
    body: &str,
    items: &[AlertItem],
    cta_url: &str,
    cta_label: &str,
) -> RenderedEmail {
    let mut text = body.trim().to_string();
    let mut inner = paragraphs(body);
    if !items.is_empty() {
        text.push_str("\n\n");
        text.push_str(items_text(items).trim_end());
        inner.push_str(&format!("\n<ul>{}</ul>", items_html(items)));
    }
    text.push_str(&format!("\n\n{}: {}", cta_label, cta_url));
    inner.push_str(&format!("\n{}", button(cta_url, cta_label)));
    let html = layout(&subject, &inner);
    RenderedEmail { subject, text, html }
}

/// Plain test message for checking provider setup.
pub fn test_message() -> RenderedEmail {
    RenderedEmail {
        subject: format!("{} test email", BRAND),
        text: "This is a test email. If you can read it, delivery works.".to_string(),
        html: layout("Test email", "<p>This is a test email. If you can read it, delivery works.</p>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_alert_counts_and_escapes() {
        let items = vec![
            AlertItem { title: "Villa <Bella>".into(), url: None, price: Some(250000.0), city: Some("Lucca".into()) },
            AlertItem { title: "Casa".into(), ..Default::default() },
        ];
        let filters = SearchFilters { city: Some("lucca".into()), ..Default::default() };
        let email = property_alert("https://domy.example/", "Jana", "Tuscany", &items, &filters);
        assert_eq!(email.subject, "New Properties Found: 2 matches your search");
        assert!(email.html.contains("Villa &lt;Bella&gt;"));
        assert!(email.html.contains("City: lucca"));
        assert!(email.text.contains("https://domy.example/dashboard/recommendations"));
        assert!(email.text.contains("€250 000"));
    }

    #[test]
    fn test_inquiry_confirmation_escapes_message() {
        let email = inquiry_confirmation("https://domy.example", "Tom", "Casa Blu", "<script>x</script>");
        assert_eq!(email.subject, "Inquiry Confirmation - Casa Blu");
        assert!(!email.html.contains("<script>"));
    }

    #[test]
    fn test_generated_copy_becomes_paragraphs() {
        let email = from_generated_copy("Hello".into(), "First line\n\nSecond", &[], "https://x", "Open");
        assert!(email.html.contains("<p>First line</p>"));
        assert!(email.html.contains("<p>Second</p>"));
        assert!(email.text.ends_with("Open: https://x"));
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(1234567.0), "€1 234 567");
        assert_eq!(format_price(950.0), "€950");
    }

    #[test]
    fn test_generated_alert_keeps_listings() {
        let items = vec![AlertItem {
            title: "Villa Chianti".into(),
            url: Some("https://domy.example/properties/villa-chianti".into()),
            price: Some(300000.0),
            city: Some("Siena".into()),
        }];
        let email = from_generated_copy("Fresh finds".into(), "Dear Jana, good news.", &items, "https://x", "Open");
        assert!(email.html.contains(r#"<a href="https://domy.example/properties/villa-chianti">Villa Chianti</a>"#));
        assert!(email.html.contains("€300 000"));
        assert!(email.text.contains("- Villa Chianti (€300 000) https://domy.example/properties/villa-chianti"));
        assert!(email.text.ends_with("Open: https://x"));
    }
}
