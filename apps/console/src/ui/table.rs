use shared::protocol::ProductRecord;

use crate::ui::format_price;

const HEADERS: [&str; 6] = ["Category", "Title", "Origin price", "Price", "Enabled", "Id"];

fn row(product: &ProductRecord) -> [String; 6] {
    [
        product.category.clone(),
        product.title.clone(),
        format_price(product.origin_price),
        format_price(product.price),
        if product.enabled() { "enabled" } else { "disabled" }.to_string(),
        product.id.to_string(),
    ]
}

pub fn render_product_table(products: &[ProductRecord]) -> String {
    if products.is_empty() {
        return "No products yet.".to_string();
    }

    let rows: Vec<[String; 6]> = products.iter().map(row).collect();
    let mut widths = HEADERS.map(|header| header.chars().count());
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[String]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| {
                let pad = width - cell.chars().count();
                format!("{cell}{}", " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let header_cells = HEADERS.map(str::to_string);
    let mut lines = vec![format_line(&header_cells)];
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    lines.extend(rows.iter().map(|cells| format_line(cells)));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::ProductId;

    fn product(id: &str, title: &str, price: f64, enabled: bool) -> ProductRecord {
        ProductRecord {
            id: ProductId::from(id),
            title: title.to_string(),
            category: "tea".to_string(),
            origin_price: 500.0,
            price,
            unit: "tin".to_string(),
            description: String::new(),
            content: String::new(),
            is_enabled: u8::from(enabled),
            image_url: String::new(),
            images_url: Vec::new(),
        }
    }

    #[test]
    fn renders_aligned_rows() {
        let table = render_product_table(&[
            product("p1", "Sencha", 420.0, true),
            product("p22", "Hojicha", f64::NAN, false),
        ]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "Category | Title   | Origin price | Price | Enabled  | Id"
        );
        assert_eq!(lines[2], "tea      | Sencha  | 500          | 420   | enabled  | p1");
        assert_eq!(lines[3], "tea      | Hojicha | 500          | -     | disabled | p22");
    }

    #[test]
    fn empty_list_has_placeholder() {
        assert_eq!(render_product_table(&[]), "No products yet.");
    }
}
