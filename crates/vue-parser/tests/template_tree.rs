//! Integration tests for the template tree shape consumed by the emitter.

use vue_parser::{parse_sfc, parse_template, Element, TemplateNode, TemplateParseOptions};

fn root(source: &str) -> Element {
    let result = parse_template(source, TemplateParseOptions::default());
    assert!(result.errors.is_empty(), "unexpected errors: {:?}", result.errors);
    result.root.expect("template should have a root")
}

/// Renders the tree as an indented outline.
fn outline(element: &Element) -> String {
    fn walk(node: &TemplateNode, depth: usize, out: &mut String) {
        let pad = "  ".repeat(depth);
        match node {
            TemplateNode::Element(el) => {
                out.push_str(&format!("{}<{}>", pad, el.tag));
                if let Some(source) = &el.for_source {
                    out.push_str(&format!(" for={}:{}", el.alias.as_deref().unwrap_or(""), source));
                }
                if let Some(condition) = &el.if_condition {
                    out.push_str(&format!(" if={}", condition));
                }
                if let Some(condition) = &el.else_if_condition {
                    out.push_str(&format!(" else-if={}", condition));
                }
                if el.is_else {
                    out.push_str(" else");
                }
                out.push('\n');
                for child in &el.children {
                    walk(child, depth + 1, out);
                }
                for branch in &el.if_conditions {
                    walk(&TemplateNode::Element(branch.block.clone()), depth, out);
                }
            }
            TemplateNode::DynamicText(_) => out.push_str(&format!("{}#dynamic\n", pad)),
            TemplateNode::StaticText(t) => out.push_str(&format!("{}{:?}\n", pad, t.text)),
            TemplateNode::Comment(c) => out.push_str(&format!("{}<!--{}-->\n", pad, c.data)),
        }
    }
    let mut out = String::new();
    walk(&TemplateNode::Element(element.clone()), 0, &mut out);
    out
}

#[test]
fn test_todo_list_outline() {
    let el = root(
        r#"<section class="todos">
  <h1>{{ title }}</h1>
  <ul v-if="items.length">
    <li v-for="item in items" :key="item.id" @click="toggle(item)">
      <span v-if="item.done">done</span>
      <span v-else-if="item.late">late</span>
      <span v-else>open</span>
    </li>
  </ul>
  <p v-else>Nothing to do</p>
</section>"#,
    );

    insta::assert_snapshot!(outline(&el), @r###"
    <section>
      <h1>
        #dynamic
      " "
      <ul> if=items.length
        <li> for=item:items
          <span> if=item.done
            "done"
          <span> else-if=item.late
            "late"
          <span> else
            "open"
      <p> else
        "Nothing to do"
    "###);
}

#[test]
fn test_attributes_keep_source_order() {
    let el = root(r#"<input :value="v" @input="set" disabled type="text">"#);
    let names: Vec<&str> = el.attrs_map.keys().map(|k| k.as_str()).collect();
    assert_eq!(names, vec![":value", "@input", "disabled", "type"]);
    assert_eq!(el.attr("disabled"), Some(""));
}

#[test]
fn test_component_through_splitter() {
    let source = "<template>\n  <div id=\"app\">{{ msg }}</div>\n</template>\n<script>\nexport default { data: () => ({ msg: 'hi' }) }\n</script>\n";
    let sfc = parse_sfc(source);
    assert!(sfc.errors.is_empty());
    let template = sfc.descriptor.template.expect("template block");
    let el = root(&template.content);
    assert_eq!(el.tag, "div");
    assert_eq!(el.attr("id"), Some("app"));
}
