//! `{{name}}` placeholder templates.
//!
//! Values are HTML-escaped when filled into a body. A placeholder without a
//! value is an error; the message is not sent half-rendered.

use std::collections::HashMap;

use conduct_core::errors::{ConductError, ConductResult};

pub type Vars = HashMap<&'static str, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub subject: &'static str,
    pub html: &'static str,
}

impl Template {
    /// Renders `(subject, html)`. Only the body is escaped.
    pub fn render(&self, vars: &Vars) -> ConductResult<(String, String)> {
        Ok((fill(self.subject, vars, false)?, fill(self.html, vars, true)?))
    }
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
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

pub fn fill(template: &str, vars: &Vars, escape: bool) -> ConductResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let close = after.find("}}").ok_or_else(|| {
            ConductError::Notification("Unclosed placeholder in template".to_string())
        })?;
        let name = after[..close].trim();
        let value = vars.get(name).ok_or_else(|| {
            ConductError::Notification(format!("Missing template value: {}", name))
        })?;
        if escape {
            out.push_str(&escape_html(value));
        } else {
            out.push_str(value);
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

pub const DETENTION_ASSIGNED: Template = Template {
    subject: "Detention assigned for {{student_name}}",
    html: "<p>Hello {{student_name}},</p>\
<p>You have been assigned detention for <strong>{{violation_type}}</strong> \
by {{teacher_name}} on {{assigned_date}}.</p>\
<p>Please report to {{location}} on <strong>{{detention_date}}</strong> at {{detention_time}}.</p>",
};

/// Appended to the detention notice while the parent has not yet verified.
pub const PARENT_ACCESS: Template = Template {
    subject: "",
    html: "<p>Parents can follow this record online. Visit {{portal_url}} and \
enter the access code <strong>{{access_code}}</strong>.</p>",
};

pub const DETENTION_RESCHEDULED: Template = Template {
    subject: "Detention rescheduled for {{student_name}}",
    html: "<p>Hello {{student_name}},</p>\
<p>You missed your detention for <strong>{{violation_type}}</strong>. \
It has been moved to <strong>{{new_date}}</strong> at {{detention_time}} in {{location}}.</p>",
};

pub const MONITOR_SIGNUP: Template = Template {
    subject: "Detention monitor sign-up confirmed",
    html: "<p>Hello {{teacher_name}},</p>\
<p>Thank you for monitoring detention in {{location}} on: {{dates}}.</p>",
};

pub const MONITOR_REMINDER: Template = Template {
    subject: "Reminder: you are monitoring detention today",
    html: "<p>Hello {{teacher_name}},</p>\
<p>You are monitoring detention today, {{date}}, at {{detention_time}} in {{location}}.</p>",
};

pub const TEACHER_APPROVED: Template = Template {
    subject: "Your account has been approved",
    html: "<p>Hello {{teacher_name}},</p>\
<p>An administrator approved your account. You can now record infractions.</p>",
};

pub const TEACHER_SUSPENDED: Template = Template {
    subject: "Your account has been suspended",
    html: "<p>Hello {{teacher_name}},</p>\
<p>An administrator suspended your account. Contact the office if this is unexpected.</p>",
};
