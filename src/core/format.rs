//! Message assembly for order-placed notifications.
//!
//! Plain values (customer contact, address, total) are produced first and
//! only escaped when placed into the template, so every parse mode gets the
//! same text with its own markup.

use crate::domain::model::{Customer, Order, ParseMode, ShippingAddress};

const NO_ADDRESS: &str = "not provided";

/// Currencies whose ISO 4217 minor unit is not 2.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &[
    "BIF", "CLP", "DJF", "GNF", "ISK", "JPY", "KMF", "KRW", "PYG", "RWF", "UGX", "VND", "VUV",
    "XAF", "XOF", "XPF",
];
const THREE_DECIMAL_CURRENCIES: &[&str] = &["BHD", "IQD", "JOD", "KWD", "LYD", "OMR", "TND"];

/// Characters Telegram reserves outside entities in MarkdownV2.
const MARKDOWN_V2_RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\',
];

/// Email and phone of the customer, whichever are present, joined by `" - "`.
pub fn customer_info(customer: Option<&Customer>) -> String {
    let Some(customer) = customer else {
        return String::new();
    };

    [customer.email.as_deref(), customer.phone.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" - ")
}

fn join_present(parts: &[&str], separator: &str) -> String {
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// One-line shipping address: `address_1, address_2 city, province postal_code COUNTRY`.
///
/// Absent parts are left out together with their separators.
pub fn shipping_address(address: Option<&ShippingAddress>) -> String {
    let Some(address) = address else {
        return NO_ADDRESS.to_string();
    };

    let field = |value: &Option<String>| value.as_deref().unwrap_or("").trim().to_string();

    let (address_1, address_2) = (field(&address.address_1), field(&address.address_2));
    let (city, province) = (field(&address.city), field(&address.province));
    let postal_code = field(&address.postal_code);
    let country = field(&address.country_code).to_uppercase();

    let street = join_present(&[address_1.as_str(), address_2.as_str()], ", ");
    let region = join_present(&[province.as_str(), postal_code.as_str()], " ");
    let locality = join_present(&[city.as_str(), region.as_str()], ", ");

    let formatted = join_present(&[street.as_str(), locality.as_str(), country.as_str()], " ");
    if formatted.is_empty() {
        NO_ADDRESS.to_string()
    } else {
        formatted
    }
}

/// Number of decimal digits in the currency's minor unit.
pub fn minor_unit_exponent(currency_code: &str) -> u32 {
    let code = currency_code.to_ascii_uppercase();
    if ZERO_DECIMAL_CURRENCIES.contains(&code.as_str()) {
        0
    } else if THREE_DECIMAL_CURRENCIES.contains(&code.as_str()) {
        3
    } else {
        2
    }
}

fn currency_prefix(code: &str) -> String {
    let symbol = match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "INR" => "₹",
        "CAD" => "CA$",
        "AUD" => "A$",
        "MXN" => "MX$",
        "NZD" => "NZ$",
        "HKD" => "HK$",
        "BRL" => "R$",
        "KRW" => "₩",
        "VND" => "₫",
        "ILS" => "₪",
        "TWD" => "NT$",
        "CNY" => "CN¥",
        "PHP" => "₱",
        "XAF" => "FCFA\u{a0}",
        "XOF" => "F\u{202f}CFA\u{a0}",
        _ => return format!("{}\u{a0}", code),
    };
    symbol.to_string()
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// en-US currency formatting of an amount given in minor units, e.g. `123456` USD
/// becomes `$1,234.56`.
pub fn format_currency(amount_minor: i64, currency_code: &str) -> String {
    let code = currency_code.trim().to_ascii_uppercase();
    let exponent = minor_unit_exponent(&code);
    let scale = 10u64.pow(exponent);

    let absolute = amount_minor.unsigned_abs();
    let whole = group_thousands(&(absolute / scale).to_string());
    let number = if exponent == 0 {
        whole
    } else {
        format!(
            "{}.{:0width$}",
            whole,
            absolute % scale,
            width = exponent as usize
        )
    };

    let sign = if amount_minor < 0 { "-" } else { "" };
    format!("{}{}{}", sign, currency_prefix(&code), number)
}

/// Escape free text so Telegram shows it literally under `mode`.
pub fn escape(text: &str, mode: ParseMode) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match mode {
            ParseMode::Markdown => {
                if matches!(ch, '_' | '*' | '`' | '[') {
                    escaped.push('\\');
                }
                escaped.push(ch);
            }
            ParseMode::MarkdownV2 => {
                if MARKDOWN_V2_RESERVED.contains(&ch) {
                    escaped.push('\\');
                }
                escaped.push(ch);
            }
            ParseMode::Html => match ch {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                _ => escaped.push(ch),
            },
        }
    }
    escaped
}

fn bold(text: &str, mode: ParseMode) -> String {
    match mode {
        ParseMode::Markdown | ParseMode::MarkdownV2 => format!("*{}*", escape(text, mode)),
        ParseMode::Html => format!("<b>{}</b>", escape(text, mode)),
    }
}

fn link(label: &str, url: &str, mode: ParseMode) -> String {
    match mode {
        // 舊版 Markdown 的連結網址不需跳脫
        ParseMode::Markdown => format!("[{}]({})", escape(label, mode), url),
        ParseMode::MarkdownV2 => format!(
            "[{}]({})",
            escape(label, mode),
            url.replace('\\', "\\\\").replace(')', "\\)")
        ),
        ParseMode::Html => format!(
            "<a href=\"{}\">{}</a>",
            escape(url, mode),
            escape(label, mode)
        ),
    }
}

/// Five-line message announcing a placed order, marked up for `mode`.
pub fn order_placed_message(order: &Order, admin_base_url: &str, mode: ParseMode) -> String {
    let admin = admin_base_url.trim_end_matches('/');
    let text = |value: &str| escape(value, mode);
    let customer = order.customer.as_ref();

    let mut contact = customer_info(customer);
    if contact.is_empty() {
        contact = order.email.clone().unwrap_or_default();
    }
    let customer_line = match customer {
        Some(c) => format!(
            "🍭 {}{}{}{}",
            text("Customer: "),
            text(&format!("{} (", contact)),
            link("details", &format!("{}/a/customers/{}", admin, c.id), mode),
            text(")")
        ),
        None => format!("🍭 {}", text(&format!("Customer: {}", contact))),
    };

    let total = format_currency(order.paid_total, order.currency_code().unwrap_or("USD"));

    [
        format!(
            "💌 {}{}{}",
            text("Order "),
            bold(&format!("#{}", order.display_id), mode),
            text(" placed successfully")
        ),
        format!(
            "📝 {}{}",
            text("Order details: "),
            link("view", &format!("{}/a/orders/{}", admin, order.id), mode)
        ),
        customer_line,
        format!("💰 {}", text(&format!("Total amount: {}", total))),
        format!(
            "🚚 {}",
            text(&format!(
                "Shipping address: {}",
                shipping_address(order.shipping_address.as_ref())
            ))
        ),
    ]
    .join("\n")
}
