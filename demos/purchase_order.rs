use tracing::info;

use xmlbind_core::{ElementType, Parser, PrefixMap};

const PURCHASE_ORDER: &str = r#"<?xml version="1.0"?>
<purchaseOrder orderDate="1999-10-20">
    <shipTo country="US">
        <name>Alice Smith</name>
        <street>123 Maple Street</street>
    </shipTo>
    <billTo country="US">
        <name>Robert Smith</name>
        <street>8 Oak Avenue</street>
    </billTo>
    <comment>Hurry, my lawn is going wild</comment>
    <items>
        <item partNum="872-AA">
            <productName>Lawnmower</productName>
            <quantity>1</quantity>
        </item>
        <item partNum="926-AA">
            <productName>Baby Monitor</productName>
            <quantity>1</quantity>
        </item>
    </items>
</purchaseOrder>"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let events = xmlbind_tokens::tokenize(PURCHASE_ORDER)?;
    info!(count = events.len(), "tokenized purchase order");

    let mut parser = Parser::new("po");
    parser.register(
        ElementType::new("purchaseOrder", "po")
            .with_slots(&["shipTo", "billTo", "comment", "items"])
            .with_attributes(&["orderDate"]),
    );
    parser.register(
        ElementType::new("shipTo", "po")
            .with_slots(&["name", "street"])
            .with_attributes(&["country"]),
    );
    parser.register(
        ElementType::new("billTo", "po")
            .with_slots(&["name", "street"])
            .with_attributes(&["country"]),
    );
    parser.register(ElementType::new("items", "po").with_slots(&["item"]));
    parser.register(
        ElementType::new("item", "po")
            .with_slots(&["productName", "quantity"])
            .with_attributes(&["partNum"]),
    );

    let order = parser.parse(PURCHASE_ORDER)?;
    println!("Order placed {}", order.get("orderDate")?.unwrap_or("?"));
    if let Some(comment) = order.child("comment") {
        println!("  Comment: {}", comment.text());
    }
    for addr in ["shipTo", "billTo"] {
        if let Some(address) = order.child(addr) {
            let name = address.child("name").map(|n| n.text()).unwrap_or("?");
            println!("  {addr}: {name} ({})", address.get("country")?.unwrap_or("?"));
        }
    }
    if let Some(items) = order.child("items") {
        for item in items.children("item") {
            let product = item.child("productName").map(|p| p.text()).unwrap_or("?");
            println!(
                "  Item {}: {product}",
                item.get("partNum")?.unwrap_or("?")
            );
        }
    }

    println!("\nRe-exported:\n{}", order.export(&PrefixMap::new()));
    Ok(())
}
