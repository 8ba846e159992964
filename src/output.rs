use crate::model::{CategorySummary, Product, ProductView};
use crate::query::{Query, ResultPage};

pub fn format_result_page(result: &ResultPage, query: &Query, currency: &str) -> String {
    let mut out = String::new();

    let heading = if query.search.is_empty() {
        "## Products".to_string()
    } else {
        format!("## Products matching \"{}\"", query.search)
    };
    out.push_str(&format!(
        "{} (page {} of {}, {} found, sorted by {})\n\n",
        heading,
        result.page,
        result.total_pages,
        format_number(result.total_matches as u64),
        query.sort.as_str()
    ));

    if result.products.is_empty() {
        if result.total_matches == 0 {
            out.push_str("No products match these filters.\n");
        } else {
            out.push_str(&format!(
                "Page {} is out of range; try a page between 1 and {}.\n",
                result.page, result.total_pages
            ));
        }
        return out;
    }

    let offset = (result.page as usize).saturating_sub(1) * result.page_size;
    for (i, product) in result.products.iter().enumerate() {
        out.push_str(&format!("### {}. {}\n", offset + i + 1, product.title));
        format_summary(product, currency, &mut out);

        if i < result.products.len() - 1 {
            out.push_str("\n---\n\n");
        }
    }

    out
}

fn format_summary(product: &Product, currency: &str, out: &mut String) {
    out.push_str(&format!("- **Brand:** {}\n", product.brand));
    out.push_str(&format!("- **Category:** {}\n", product.category));
    out.push_str(&format!(
        "- **Price:** {}\n",
        format_price(product.price, currency)
    ));
    out.push_str(&format!("- **Rating:** {:.1}/5\n", product.rating));
    out.push_str(&format!("- **ID:** {}\n", product.id));
}

pub fn format_product_view(view: &ProductView, currency: &str) -> String {
    let product = &view.product;
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", product.title));
    out.push_str(&product.description);
    out.push_str("\n\n");

    out.push_str("## Overview\n");
    format_summary(product, currency, &mut out);
    out.push('\n');

    if !product.details.is_empty() {
        out.push_str("## Product Details\n");
        for (key, value) in &product.details {
            out.push_str(&format!("- **{}:** {}\n", key, value));
        }
        out.push('\n');
    }

    out.push_str("## Images\n");
    if product.images.is_empty() {
        out.push_str(&format!("- {}\n", product.image));
    } else {
        for image in &product.images {
            out.push_str(&format!("- {}\n", image));
        }
    }
    out.push('\n');

    if !view.related.is_empty() {
        out.push_str("## Related Products\n");
        for related in &view.related {
            out.push_str(&format!(
                "- {} ({}, ID {})\n",
                related.title,
                format_price(related.price, currency),
                related.id
            ));
        }
        out.push('\n');
    }

    out
}

pub fn format_featured(products: &[&Product], currency: &str) -> String {
    let mut out = String::from("## Featured Products\n\n");
    if products.is_empty() {
        out.push_str("Nothing is featured right now.\n");
        return out;
    }
    for product in products {
        out.push_str(&format!(
            "- **{}** {} (ID {})\n",
            product.title,
            format_price(product.price, currency),
            product.id
        ));
    }
    out
}

pub fn format_categories(categories: &[CategorySummary]) -> String {
    let mut out = String::from("## Product Categories\n\n");
    if categories.is_empty() {
        out.push_str("The catalog has no categories.\n");
        return out;
    }
    out.push_str("| Category | Products | Description |\n");
    out.push_str("|---|---|---|\n");
    for category in categories {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            category.name,
            category.product_count,
            category.description.as_deref().unwrap_or("")
        ));
    }
    out
}

fn format_price(price: f64, currency: &str) -> String {
    let symbol = match currency {
        "USD" => "$",
        "CHF" => "CHF ",
        "EUR" => "€",
        "GBP" => "£",
        _ => currency,
    };

    let cents = (price * 100.0).round() as u64;
    format!("{}{}.{:02}", symbol, format_number(cents / 100), cents % 100)
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{query, SortKey};
    use std::collections::BTreeMap;

    fn product(id: u64, title: &str, price: f64) -> Product {
        Product {
            id,
            title: title.to_string(),
            image: format!("https://example.com/{}.jpg", id),
            description: format!("{} description.", title),
            category: "Jewelry".to_string(),
            price,
            brand: "GemCraft".to_string(),
            rating: 4.8,
            featured: false,
            images: Vec::new(),
            details: BTreeMap::new(),
        }
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(1200.0, "USD"), "$1,200.00");
        assert_eq!(format_price(999.99, "EUR"), "€999.99");
        assert_eq!(format_price(2500.0, "CHF"), "CHF 2,500.00");
        assert_eq!(format_price(5.5, "JPY"), "JPY5.50");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_result_page_numbers_continue_across_pages() {
        let products: Vec<Product> = (1..=4).map(|i| product(i, &format!("P{}", i), 10.0)).collect();
        let q = Query {
            page: 2,
            sort: SortKey::Unsorted,
            ..Default::default()
        };
        let result = query(&products, &q, 3);
        let out = format_result_page(&result, &q, "USD");
        assert!(out.contains("page 2 of 2, 4 found"));
        assert!(out.contains("### 4. P4"));
    }

    #[test]
    fn test_result_page_out_of_range() {
        let products = vec![product(1, "Emerald Pendant", 2500.0)];
        let q = Query {
            page: 5,
            ..Default::default()
        };
        let result = query(&products, &q, 6);
        let out = format_result_page(&result, &q, "USD");
        assert!(out.contains("out of range"));
    }

    #[test]
    fn test_product_view_sections() {
        let mut main = product(6, "Emerald Beads", 1800.0);
        main.details.insert("size".to_string(), "6mm".to_string());
        let view = ProductView {
            product: main,
            related: vec![product(7, "Sapphire Beads", 1600.0)],
        };
        let out = format_product_view(&view, "USD");
        assert!(out.starts_with("# Emerald Beads\n"));
        assert!(out.contains("- **size:** 6mm"));
        assert!(out.contains("## Related Products\n- Sapphire Beads ($1,600.00, ID 7)"));
    }

    #[test]
    fn test_featured_list() {
        let pendant = product(10, "Diamond Pendant", 999.99);
        let out = format_featured(&[&pendant], "USD");
        assert!(out.contains("- **Diamond Pendant** $999.99 (ID 10)"));
        assert!(format_featured(&[], "USD").contains("Nothing is featured"));
    }

    #[test]
    fn test_categories_table() {
        let out = format_categories(&[CategorySummary {
            name: "Beads".to_string(),
            description: None,
            product_count: 3,
        }]);
        assert!(out.contains("| Beads | 3 |  |"));
    }
}
