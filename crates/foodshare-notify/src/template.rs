//! Status to email template mapping.

/// Subject and body copy for a status update email.
///
/// The four lifecycle statuses map to dedicated copy; anything else falls
/// back to a generic update so the relay never rejects a status it has not
/// seen before.
pub(crate) fn status_message(status: &str) -> (String, String) {
    match status {
        "assigned" => (
            "Delivery Assigned - FoodShare".to_string(),
            "A delivery person has been assigned to pick up your food donation.".to_string(),
        ),
        "in_transit" => (
            "Food is On the Way! - FoodShare".to_string(),
            "Great news! Your food donation is now in transit and on its way.".to_string(),
        ),
        "delivered" => (
            "Delivery Complete - FoodShare".to_string(),
            "Your food donation has been successfully delivered. Thank you for making a difference!"
                .to_string(),
        ),
        "failed" => (
            "Delivery Issue - FoodShare".to_string(),
            "Unfortunately, there was an issue with the delivery. Please check your dashboard for more details."
                .to_string(),
        ),
        other => (
            "Delivery Status Update - FoodShare".to_string(),
            format!("Your delivery status has been updated to: {}", other),
        ),
    }
}

/// Escape markup-significant characters so user-supplied titles and names
/// cannot inject markup into the rendered email.
pub(crate) fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Render the email body. All interpolated strings must already be escaped
/// by the caller or escaped here.
pub(crate) fn render_email_html(
    recipient_name: &str,
    subject_title: &str,
    status: &str,
    message: &str,
) -> String {
    let recipient_name = escape_html(recipient_name);
    let subject_title = escape_html(subject_title);
    let status_label = escape_html(&status.replace('_', " "));
    let message = escape_html(message);

    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: sans-serif; color: #333;">
  <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
    <h1 style="color: #10b981;">FoodShare</h1>
    <p>Hello {recipient_name},</p>
    <p><strong>Donation:</strong> {subject_title}</p>
    <p><strong>Status:</strong> {status_label}</p>
    <p>{message}</p>
    <p>Log in to your dashboard to view more details about this delivery.</p>
    <p style="color: #9ca3af; font-size: 12px;">Thank you for being part of the FoodShare community!</p>
  </div>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_have_dedicated_copy() {
        let (subject, _) = status_message("in_transit");
        assert_eq!(subject, "Food is On the Way! - FoodShare");
        let (subject, _) = status_message("delivered");
        assert_eq!(subject, "Delivery Complete - FoodShare");
    }

    #[test]
    fn unknown_status_falls_back_to_generic_copy() {
        let (subject, message) = status_message("rescheduled");
        assert_eq!(subject, "Delivery Status Update - FoodShare");
        assert!(message.contains("rescheduled"));
    }

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape_html(r#"<script>alert("hi") & 'bye'</script>"#),
            "&lt;script&gt;alert(&quot;hi&quot;) &amp; &#39;bye&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn rendered_body_contains_no_raw_user_markup() {
        let html = render_email_html(
            "<b>Eve</b>",
            "Soup <img src=x>",
            "in_transit",
            "On the way.",
        );
        assert!(!html.contains("<b>Eve</b>"));
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;b&gt;Eve&lt;/b&gt;"));
        assert!(html.contains("in transit"));
    }
}
