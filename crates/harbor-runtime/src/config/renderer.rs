//! `${{NAME}}` placeholder templates.

use harbor_core::{ConfigRenderer, RenderContext, RenderError};

const OPEN: &str = "${{";
const CLOSE: &str = "}}";

/// Renders the project template by substituting `${{NAME}}` placeholders.
///
/// Names are matched case-insensitively. A placeholder naming a variable
/// that is not in the context fails the render.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderRenderer;

impl ConfigRenderer for PlaceholderRenderer {
    fn render(&self, ctx: &RenderContext) -> Result<String, RenderError> {
        let template =
            std::fs::read_to_string(&ctx.template).map_err(|source| RenderError::Template {
                path: ctx.template.clone(),
                source,
            })?;
        render_placeholders(&template, ctx)
    }
}

/// Substitute every placeholder in `template` from `ctx`.
pub fn render_placeholders(template: &str, ctx: &RenderContext) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut offset = 0;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];
        let end = after_open
            .find(CLOSE)
            .ok_or(RenderError::Unterminated(offset + start))?;

        let name = after_open[..end].trim().to_ascii_uppercase();
        let value = ctx
            .var(&name)
            .ok_or_else(|| RenderError::UnknownVariable(name.clone()))?;
        out.push_str(value);

        let consumed = start + OPEN.len() + end + CLOSE.len();
        rest = &rest[consumed..];
        offset += consumed;
    }

    out.push_str(rest);
    Ok(out)
}
