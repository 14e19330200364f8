//! Email template management with Handlebars
//!
//! Renders subject, plain-text, and HTML bodies from one data set, so the
//! two bodies can never drift apart.

use eyre::{eyre, Result};
use handlebars::Handlebars;
use serde_json::Value;
use std::collections::HashMap;

/// Name of the order confirmation template.
pub const ORDER_CONFIRMATION: &str = "order_confirmation";

/// Rendered template result
#[derive(Debug, Clone)]
pub struct RenderedTemplate {
    pub subject: String,
    pub body_text: Option<String>,
    pub body_html: Option<String>,
}

/// Email template definition
#[derive(Clone, Debug)]
pub struct EmailTemplate {
    pub name: String,
    pub subject: String,
    pub body_text: Option<String>,
    pub body_html: Option<String>,
}

/// Handlebars-based template engine
///
/// Supports:
/// - Variables: `{{name}}`
/// - Conditionals: `{{#if condition}}...{{/if}}`
/// - Loops: `{{#each items}}...{{/each}}`
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
    templates: HashMap<String, EmailTemplate>,
}

impl TemplateEngine {
    /// Create a new TemplateEngine with the default templates registered
    pub fn new() -> Result<Self> {
        let mut engine = Self {
            handlebars: Handlebars::new(),
            templates: HashMap::new(),
        };

        engine.register(order_confirmation_template())?;

        Ok(engine)
    }

    /// Register a template
    pub fn register(&mut self, template: EmailTemplate) -> Result<()> {
        self.handlebars
            .register_template_string(&format!("{}_subject", template.name), &template.subject)
            .map_err(|e| eyre!("Failed to register subject template: {}", e))?;

        if let Some(text) = &template.body_text {
            self.handlebars
                .register_template_string(&format!("{}_text", template.name), text)
                .map_err(|e| eyre!("Failed to register text template: {}", e))?;
        }

        if let Some(html) = &template.body_html {
            self.handlebars
                .register_template_string(&format!("{}_html", template.name), html)
                .map_err(|e| eyre!("Failed to register HTML template: {}", e))?;
        }

        self.templates.insert(template.name.clone(), template);
        Ok(())
    }

    /// Render a template by name
    pub fn render(&self, name: &str, data: &Value) -> Result<RenderedTemplate> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| eyre!("Template not found: {}", name))?;

        let subject = self
            .handlebars
            .render(&format!("{}_subject", name), data)
            .map_err(|e| eyre!("Failed to render subject: {}", e))?;

        let body_text = if template.body_text.is_some() {
            Some(
                self.handlebars
                    .render(&format!("{}_text", name), data)
                    .map_err(|e| eyre!("Failed to render text body: {}", e))?,
            )
        } else {
            None
        };

        let body_html = if template.body_html.is_some() {
            Some(
                self.handlebars
                    .render(&format!("{}_html", name), data)
                    .map_err(|e| eyre!("Failed to render HTML body: {}", e))?,
            )
        } else {
            None
        };

        Ok(RenderedTemplate {
            subject,
            body_text,
            body_html,
        })
    }
}

fn order_confirmation_template() -> EmailTemplate {
    EmailTemplate {
        name: ORDER_CONFIRMATION.to_string(),
        subject: "Your order {{order_id}} is confirmed".to_string(),
        body_text: Some(
            "\
Hi {{customer_name}},

Thanks for your order! Here is what you bought:

{{#each items}}
  - {{name}} x{{quantity}} at ${{price}}
{{/each}}

Total: ${{total}}

Track your order: {{order_link}}
"
            .to_string(),
        ),
        body_html: Some(
            "\
<html>
  <body>
    <p>Hi {{customer_name}},</p>
    <p>Thanks for your order! Here is what you bought:</p>
    <ul>
{{#each items}}
      <li>{{name}} x{{quantity}} at ${{price}}</li>
{{/each}}
    </ul>
    <p><strong>Total: ${{total}}</strong></p>
    <p><a href=\"{{order_link}}\">Track your order</a></p>
  </body>
</html>
"
            .to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order_data() -> Value {
        json!({
            "order_id": "A1",
            "customer_name": "X",
            "items": [
                { "name": "Widget", "quantity": 2, "price": 9.99 }
            ],
            "total": 19.98,
            "order_link": "https://shop.atsea.example/orders/A1",
        })
    }

    #[test]
    fn test_order_confirmation_renders_both_bodies() {
        let engine = TemplateEngine::new().unwrap();
        let rendered = engine.render(ORDER_CONFIRMATION, &order_data()).unwrap();

        assert!(rendered.subject.contains("A1"));

        let text = rendered.body_text.unwrap();
        assert!(text.contains("Widget"));
        assert!(text.contains("x2"));
        assert!(text.contains("19.98"));
        assert!(text.contains("/orders/A1"));

        let html = rendered.body_html.unwrap();
        assert!(html.contains("Widget"));
        assert!(html.contains("19.98"));
        assert!(html.contains("/orders/A1"));
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        let engine = TemplateEngine::new().unwrap();
        let err = engine.render("no_such_template", &json!({})).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_custom_template_registration() {
        let mut engine = TemplateEngine::new().unwrap();
        engine
            .register(EmailTemplate {
                name: "plain".to_string(),
                subject: "Hello {{who}}".to_string(),
                body_text: Some("Hi {{who}}".to_string()),
                body_html: None,
            })
            .unwrap();

        let rendered = engine.render("plain", &json!({ "who": "operator" })).unwrap();
        assert_eq!(rendered.subject, "Hello operator");
        assert_eq!(rendered.body_text.as_deref(), Some("Hi operator"));
        assert!(rendered.body_html.is_none());
    }
}
