use pagemark_core::extraction::PageContent;
use pagemark_core::geometry::{DisplayRect, DocumentRect};
use pagemark_core::region::TextBlock;
use pagemark_core::template::Template;
use pagemark_core::TemplateExtraction;

pub fn print_words(page: &PageContent) {
    println!(
        "Page {} ({:.2} x {:.2}), {} word(s)\n",
        page.page_number,
        page.width,
        page.height,
        page.words.len()
    );
    if page.words.is_empty() {
        return;
    }

    let max_text = page
        .words
        .iter()
        .map(|w| w.text.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    println!(
        "  {:<width$}  {:>8}  {:>8}  {:>8}  {:>8}",
        "text",
        "left",
        "bottom",
        "right",
        "top",
        width = max_text
    );
    for w in &page.words {
        println!(
            "  {:<width$}  {:>8.2}  {:>8.2}  {:>8.2}  {:>8.2}",
            w.text,
            w.bbox.left(),
            w.bbox.bottom(),
            w.bbox.right(),
            w.bbox.top(),
            width = max_text
        );
    }
}

pub fn print_blocks(blocks: &[&TextBlock]) {
    if blocks.is_empty() {
        println!("No blocks in region");
        return;
    }
    for (i, block) in blocks.iter().enumerate() {
        println!("=== Block {} [{}] ===", i + 1, format_document(&block.bbox));
        for line in block.text.lines() {
            println!("  {line}");
        }
        println!();
    }
}

pub fn print_conversion(display: &DisplayRect, document: &DocumentRect) {
    println!("  display:  {}", format_display(display));
    println!("  document: {}", format_document(document));
}

pub fn print_template_list(templates: &[Template]) {
    let max_name = templates
        .iter()
        .map(|t| t.name.chars().count())
        .max()
        .unwrap_or(10);

    for t in templates {
        println!(
            "  {:<width$}  {}  ({} selection(s))",
            t.name,
            t.id,
            t.selections.len(),
            width = max_name
        );
        if let Some(ref desc) = t.description {
            println!("  {:<width$}  {}", "", desc, width = max_name);
        }
    }
}

pub fn print_template(template: &Template) {
    println!("{} ({})\n", template.name, template.id);
    if let Some(ref desc) = template.description {
        println!("{desc}\n");
    }
    if template.selections.is_empty() {
        println!("  No selections");
        return;
    }

    let max_name = template
        .selections
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(10);

    for s in &template.selections {
        println!("  {:<width$}  {}", s.name, s.id, width = max_name);
        println!(
            "  {:<width$}  display  {}",
            "",
            format_display(&s.display),
            width = max_name
        );
        println!(
            "  {:<width$}  document {}",
            "",
            format_document(&s.document),
            width = max_name
        );
    }
}

pub fn print_extraction(result: &TemplateExtraction) {
    println!("=== {} (page {}) ===\n", result.template_name, result.page_number);

    let max_name = result
        .fields
        .iter()
        .map(|f| f.name.chars().count())
        .max()
        .unwrap_or(10);

    for f in &result.fields {
        let text = if f.text.is_empty() { "(empty)" } else { f.text.as_str() };
        println!("  {:<width$}  {}", f.name, text, width = max_name);
    }
}

fn format_display(r: &DisplayRect) -> String {
    format!("x={} y={} width={} height={}", r.x, r.y, r.width, r.height)
}

fn format_document(r: &DocumentRect) -> String {
    format!(
        "bottom-left=({}, {}) top-right=({}, {})",
        r.bottom_left_x, r.bottom_left_y, r.top_right_x, r.top_right_y
    )
}
