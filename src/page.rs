use crate::assets::assets;
use crate::book::Book;
use anyhow::Result;

assets!(TEMPLATES, "templates", ["book.html", "style.css", "scroll.js"]);

pub fn template_env() -> minijinja::Environment<'static> {
    let mut env = minijinja::Environment::new();

    // Register embedded templates, which are available in release mode.
    #[cfg(not(debug_assertions))]
    for (name, source) in TEMPLATES.contents() {
        env.add_template(name, source)
            .expect("error in embedded template");
    }

    // In debug mode only, load templates directly from the filesystem.
    #[cfg(debug_assertions)]
    for (name, source) in TEMPLATES.read_all() {
        env.add_template_owned(name, source.expect("error reading template"))
            .expect("error in loaded template");
    }

    env
}

/// Render the host page: the introduction area, the table-of-contents
/// container, and the body container with the assembled content filling the
/// placeholder slot. When `sync` is set, the page carries the scroll-sync
/// script, seeded with the persisted offset (or none).
pub fn render_page(
    book: &Book,
    env: &minijinja::Environment<'_>,
    initial_offset: Option<f64>,
    sync: bool,
) -> Result<String> {
    let toc: Vec<_> = book
        .sections
        .iter()
        .map(|entry| {
            minijinja::context! {
                href => entry.href(),
                class => entry.indent_class(),
                title => entry.title,
            }
        })
        .collect();

    // Rendered into a script, so "null" rather than an empty value.
    let offset = match initial_offset {
        Some(y) => y.to_string(),
        None => "null".to_string(),
    };

    let tmpl = env.get_template("book.html")?;
    let html = tmpl.render(minijinja::context! {
        title => book.title,
        introduction => book.introduction,
        toc => toc,
        body => book.body,
        sync => sync,
        initial_offset => offset,
    })?;
    Ok(html)
}
