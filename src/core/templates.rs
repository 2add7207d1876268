use chrono::{DateTime, Utc};

pub const PANIC_ALERT_SUBJECT: &str = "🚨 URGENT: Panic Alert Activated";
pub const PAYMENT_CONFIRMATION_SUBJECT: &str = "Payment Confirmation - SafeGuard Premium";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTemplate {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// 座標照原樣輸出，整數值保留 `.0` (例如 `6.0`)
pub fn format_coordinate(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

pub fn map_link(latitude: f64, longitude: f64) -> String {
    format!(
        "https://www.google.com/maps?q={},{}",
        format_coordinate(latitude),
        format_coordinate(longitude)
    )
}

/// 千分位加兩位小數，例如 `1234.5` -> `1,234.50`
pub fn format_amount(amount: f64) -> String {
    if !amount.is_finite() {
        return "0.00".to_string();
    }
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

pub fn panic_alert(
    reporter_name: &str,
    latitude: f64,
    longitude: f64,
    timestamp: DateTime<Utc>,
) -> RenderedTemplate {
    let link = map_link(latitude, longitude);
    let latitude = format_coordinate(latitude);
    let longitude = format_coordinate(longitude);
    let time = timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string();

    let text = format!(
        r#"
URGENT PANIC ALERT

A panic button has been activated by {reporter_name}

Location:
Latitude: {latitude}
Longitude: {longitude}
Google Maps: {link}

Time: {time}

Please respond immediately.

- SafeGuard Security System
"#
    );

    let html = format!(
        r#"
<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6;">
    <div style="background-color: #ff0000; color: white; padding: 20px; text-align: center;">
        <h1>{PANIC_ALERT_SUBJECT}</h1>
    </div>
    <div style="padding: 20px;">
        <p>A panic button has been activated by <strong>{reporter_name}</strong></p>

        <h3>Location:</h3>
        <ul>
            <li>Latitude: {latitude}</li>
            <li>Longitude: {longitude}</li>
            <li><a href="{link}" style="color: #0066cc;">View on Google Maps</a></li>
        </ul>

        <p><strong>Time:</strong> {time}</p>

        <p style="color: #ff0000; font-weight: bold;">Please respond immediately.</p>

        <hr style="margin-top: 30px;">
        <p style="color: #666; font-size: 12px;">SafeGuard Security System</p>
    </div>
</body>
</html>
"#,
        reporter_name = escape_html(reporter_name),
    );

    RenderedTemplate {
        subject: PANIC_ALERT_SUBJECT.to_string(),
        text,
        html,
    }
}

pub fn payment_confirmation(amount: f64, reference: &str) -> RenderedTemplate {
    let amount = format_amount(amount);

    let text = format!(
        r#"
Thank you for your payment!

Your premium subscription has been activated.

Transaction Details:
Amount: ₦{amount}
Reference: {reference}

You now have access to premium features including:
- Security Escort tracking
- Priority support
- Advanced features

Thank you for choosing SafeGuard.

- SafeGuard Team
"#
    );

    let html = format!(
        r#"
<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6;">
    <div style="background-color: #4CAF50; color: white; padding: 20px; text-align: center;">
        <h1>✓ Payment Confirmed</h1>
    </div>
    <div style="padding: 20px;">
        <p>Thank you for your payment!</p>
        <p>Your premium subscription has been activated.</p>

        <h3>Transaction Details:</h3>
        <ul>
            <li><strong>Amount:</strong> ₦{amount}</li>
            <li><strong>Reference:</strong> {reference}</li>
        </ul>

        <h3>Premium Features Now Available:</h3>
        <ul>
            <li>✓ Security Escort tracking</li>
            <li>✓ Priority support</li>
            <li>✓ Advanced features</li>
        </ul>

        <p>Thank you for choosing SafeGuard.</p>

        <hr style="margin-top: 30px;">
        <p style="color: #666; font-size: 12px;">SafeGuard Team</p>
    </div>
</body>
</html>
"#,
        reference = escape_html(reference),
    );

    RenderedTemplate {
        subject: PAYMENT_CONFIRMATION_SUBJECT.to_string(),
        text,
        html,
    }
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
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
