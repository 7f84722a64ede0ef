use crate::reminder::ReminderKind;
use regex::{Captures, Regex};
use std::{collections::BTreeMap, sync::OnceLock};

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").unwrap())
}

/// An editable email template. `subject` and `body` may contain
/// placeholders of the form `{{ name }}`.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailTemplate {
    pub key: String,
    pub subject: String,
    pub body: String,
}

/// Values substituted into an `EmailTemplate`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateVars(BTreeMap<String, String>);

impl TemplateVars {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
    /// Placeholders without a value. They are left as is in the output.
    pub missing: Vec<String>,
}

impl EmailTemplate {
    pub fn new(
        key: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Built in template used when no template has been stored for `kind`
    pub fn default_for(kind: ReminderKind) -> Self {
        match kind {
            ReminderKind::RateJob => Self::new(
                kind.template_key(),
                "How did {{ job_name }} go?",
                "Hi {{ first_name }},\n\n\
                 It has been {{ reminder_label }} since {{ job_name }} with {{ counterpart_name }} \
                 was completed on {{ anchor_date }}.\n\
                 Please take a minute to rate the job so other renters know what to expect.\n",
            ),
            ReminderKind::OnSite => Self::new(
                kind.template_key(),
                "{{ job_name }} has been on site for {{ reminder_label }}",
                "Hi {{ first_name }},\n\n\
                 The equipment for {{ job_name }} from {{ counterpart_name }} was unpacked on \
                 {{ anchor_date }} and has now been on site for {{ reminder_label }}.\n\
                 Let {{ counterpart_name }} know when you are ready to off-hire it.\n",
            ),
        }
    }

    pub fn render(&self, vars: &TemplateVars) -> RenderedEmail {
        let mut missing = Vec::new();
        let subject = substitute(&self.subject, vars, &mut missing);
        let body = substitute(&self.body, vars, &mut missing);
        RenderedEmail {
            subject,
            body,
            missing,
        }
    }
}

fn substitute(text: &str, vars: &TemplateVars, missing: &mut Vec<String>) -> String {
    placeholder_regex()
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            match vars.get(name) {
                Some(value) => value.to_string(),
                None => {
                    if !missing.iter().any(|m| m == name) {
                        missing.push(name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}
