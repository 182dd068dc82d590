//! HTML email bodies rendered with Handlebars. Handlebars can't do much
//! without registering helpers, which is ideal here since every value
//! interpolated into these templates arrives from a public form.

use anyhow::Result;
use chrono::{Datelike, Utc};
use handlebars::Handlebars;
use serde::Serialize;

const CONTACT_EMAIL: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>New Contact Form Submission</title>
  <style>
    body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; }
    .container { border: 1px solid #ddd; border-radius: 5px; padding: 20px; margin: 20px 0; }
    .header { background-color: #0056b3; color: white; padding: 15px; text-align: center; border-radius: 5px 5px 0 0; }
    .content { padding: 20px; }
    .field { margin-bottom: 15px; }
    .label { font-weight: bold; margin-bottom: 5px; }
    .value { background-color: #f9f9f9; padding: 10px; border-radius: 3px; }
    .footer { text-align: center; margin-top: 20px; font-size: 12px; color: #666; }
    .button { display: inline-block; background-color: #0056b3; color: white; padding: 10px 20px; text-decoration: none; border-radius: 5px; margin-top: 15px; }
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h2>New Contact Form Submission</h2>
    </div>
    <div class="content">
      <div class="field">
        <div class="label">Name:</div>
        <div class="value">{{name}}</div>
      </div>
      <div class="field">
        <div class="label">Email:</div>
        <div class="value">{{email}}</div>
      </div>
      <div class="field">
        <div class="label">Phone:</div>
        <div class="value">{{phone}}</div>
      </div>
      <div class="field">
        <div class="label">Message:</div>
        <div class="value">{{message}}</div>
      </div>
      <div style="text-align: center; margin-top: 20px;">
        <a href="mailto:{{email}}" class="button">Reply to {{name}}</a>
      </div>
    </div>
    <div class="footer">
      <p>&copy; {{year}} {{org_name}}. All rights reserved.</p>
    </div>
  </div>
</body>
</html>
"#;

const BOOKING_CONFIRMATION_EMAIL: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{#if is_client}}Your Meeting is Confirmed!{{else}}New Meeting Booking: {{full_name}}{{/if}}</title>
  <style>
    body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; }
    .container { border: 1px solid #ddd; border-radius: 5px; padding: 20px; margin: 20px 0; }
    .header { background-color: #0056b3; color: white; padding: 15px; text-align: center; border-radius: 5px 5px 0 0; }
    .content { padding: 20px; }
    .field { margin-bottom: 15px; }
    .label { font-weight: bold; margin-bottom: 5px; }
    .value { background-color: #f9f9f9; padding: 10px; border-radius: 3px; }
    .footer { text-align: center; margin-top: 20px; font-size: 12px; color: #666; }
    .note { background-color: #fff8e1; padding: 10px; border-left: 4px solid #ffc107; margin: 15px 0; }
    .meet-link { background-color: #e8f0fe; padding: 20px; border-radius: 5px; margin: 20px 0; text-align: center; border: 1px solid #4285F4; }
    .meeting-details { margin: 25px 0; border: 1px solid #ddd; border-radius: 5px; padding: 15px; }
    .meeting-details h3 { margin-top: 0; border-bottom: 1px solid #eee; padding-bottom: 10px; color: #0056b3; }
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h2>{{#if is_client}}Your Meeting is Confirmed!{{else}}New Meeting Booking: {{full_name}}{{/if}}</h2>
    </div>
    <div class="content">
      {{#if is_client}}
      <p>Thank you for booking a meeting with {{org_name}}. Your {{meeting_type}} meeting has been scheduled for {{meeting_date}} at {{meeting_time}}.</p>
      {{else}}
      <p>{{full_name}} from {{company_name}} has booked a {{meeting_type}} meeting for {{meeting_date}} at {{meeting_time}}.</p>
      {{/if}}

      {{#if meet_link}}
      <div class="meet-link">
        <h3 style="margin-bottom: 10px; color: #4285F4;">Video Call Link</h3>
        <p style="font-size: 16px; margin-bottom: 15px;">Join the meeting using this link:</p>
        <a href="{{meet_link}}"
           style="display: inline-block; background-color: #4285F4; color: white; padding: 12px 24px; text-decoration: none; border-radius: 5px; font-weight: bold; font-size: 16px;"
           target="_blank">
          Join Meeting
        </a>
        <p style="margin-top: 10px; font-size: 14px; color: #555;">
          Or copy this link: <span style="font-family: monospace; background-color: #f5f5f5; padding: 3px 6px; border-radius: 3px;">{{meet_link}}</span>
        </p>
      </div>
      {{else}}
      <div class="note">
        <p><strong>Note:</strong> This meeting does not include a video call link. Please check your email for any alternative meeting instructions.</p>
      </div>
      {{/if}}

      <div class="meeting-details">
        <h3>Meeting Details</h3>
        <div class="field">
          <div class="label">Meeting Type:</div>
          <div class="value">{{meeting_type}}</div>
        </div>
        <div class="field">
          <div class="label">Date:</div>
          <div class="value">{{meeting_date}}</div>
        </div>
        <div class="field">
          <div class="label">Time:</div>
          <div class="value">{{meeting_time}}</div>
        </div>
        <div class="field">
          <div class="label">Name:</div>
          <div class="value">{{full_name}}</div>
        </div>
        <div class="field">
          <div class="label">Email:</div>
          <div class="value">{{email}}</div>
        </div>
        <div class="field">
          <div class="label">Phone:</div>
          <div class="value">{{phone_number}}</div>
        </div>
        <div class="field">
          <div class="label">Company:</div>
          <div class="value">{{company_name}}</div>
        </div>
        {{#if message}}
        <div class="field">
          <div class="label">Message:</div>
          <div class="value">{{message}}</div>
        </div>
        {{/if}}
      </div>

      <div class="note">
        <p>{{calendar_note}}</p>
      </div>

      {{#if is_client}}
      <p>We've attached a calendar invitation to this email. You can add it to your calendar by opening the attachment.</p>
      <p>If you need to reschedule or cancel this meeting, please reply to this email or contact us at {{staff_email}}.</p>
      {{else}}
      <p>This meeting has been added to the {{org_name}} calendar. A calendar invitation is attached to this email.</p>
      {{/if}}
    </div>
    <div class="footer">
      <p>&copy; {{year}} {{org_name}}. All rights reserved.</p>
    </div>
  </div>
</body>
</html>
"#;

#[derive(Serialize)]
pub struct ContactEmail<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub message: &'a str,
    pub org_name: &'a str,
    pub year: i32,
}

#[derive(Serialize)]
pub struct BookingEmail<'a> {
    pub is_client: bool,
    pub full_name: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
    pub company_name: &'a str,
    pub meeting_date: &'a str,
    pub meeting_time: &'a str,
    pub meeting_type: &'a str,
    pub message: Option<&'a str>,
    pub meet_link: Option<&'a str>,
    pub calendar_note: &'a str,
    pub org_name: &'a str,
    pub staff_email: &'a str,
    pub year: i32,
}

/// The current year for the footer line.
pub fn footer_year() -> i32 {
    Utc::now().year()
}

pub fn contact_email(data: &ContactEmail) -> Result<String> {
    let handlebars = Handlebars::new();
    Ok(handlebars.render_template(CONTACT_EMAIL, data)?)
}

pub fn booking_confirmation_email(data: &BookingEmail) -> Result<String> {
    let handlebars = Handlebars::new();
    Ok(handlebars.render_template(BOOKING_CONFIRMATION_EMAIL, data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_booking_email(is_client: bool, meet_link: Option<&'static str>) -> BookingEmail<'static> {
        BookingEmail {
            is_client,
            full_name: "Ada Lovelace",
            email: "ada@example.com",
            phone_number: "Not provided",
            company_name: "Analytical Engines",
            meeting_date: "Monday, September 14, 2026",
            meeting_time: "3:00 PM",
            meeting_type: "Consultation",
            message: None,
            meet_link,
            calendar_note: "Please use the attached .ics file.",
            org_name: "Example Org",
            staff_email: "hello@example.org",
            year: 2026,
        }
    }

    #[test]
    fn test_contact_email_renders_fields() {
        let html = contact_email(&ContactEmail {
            name: "Ada Lovelace",
            email: "ada@example.com",
            phone: "Not provided",
            message: "I'd like to talk about a project.",
            org_name: "Example Org",
            year: 2026,
        })
        .unwrap();

        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains("mailto:ada@example.com"));
        assert!(html.contains("Example Org"));
    }

    #[test]
    fn test_contact_email_escapes_html_in_user_content() {
        let html = contact_email(&ContactEmail {
            name: "<script>alert(1)</script>",
            email: "ada@example.com",
            phone: "Not provided",
            message: "hi",
            org_name: "Example Org",
            year: 2026,
        })
        .unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_booking_email_client_variant() {
        let html = booking_confirmation_email(&test_booking_email(
            true,
            Some("https://meet.google.com/abc-defg-hij"),
        ))
        .unwrap();

        assert!(html.contains("Your Meeting is Confirmed!"));
        assert!(html.contains("Thank you for booking a meeting with Example Org"));
        assert!(html.contains("https://meet.google.com/abc-defg-hij"));
    }

    #[test]
    fn test_booking_email_staff_variant() {
        let html = booking_confirmation_email(&test_booking_email(false, None)).unwrap();

        assert!(html.contains("New Meeting Booking: Ada Lovelace"));
        assert!(html.contains("has booked a Consultation meeting"));
        assert!(html.contains("does not include a video call link"));
    }
}
