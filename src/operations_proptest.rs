//! Property-based tests for text substitution over generated documents.

#[cfg(test)]
mod proptest_tests {
    use crate::document::Document;
    use crate::env::EnvVars;
    use crate::logging::NullLog;
    use crate::operations::Operation;
    use proptest::prelude::*;
    use regex::Regex;

    /// One child of the document element: name, attribute value, inner text
    /// and the text that follows the element.
    type Child = (String, String, String, String);

    fn child() -> impl Strategy<Value = Child> {
        ("[a-d]{1,4}", "[a-d]{0,4}", "[a-d]{1,6}", "[a-d]{1,3}")
    }

    fn render(children: &[Child], edit: impl Fn(&str) -> String) -> String {
        let mut xml = String::from("<root>");
        for (name, attr, text, tail) in children {
            xml.push_str(&format!(
                "<{name} key=\"{attr}\">{}</{name}>{}",
                edit(text),
                edit(tail)
            ));
        }
        xml.push_str("</root>");
        xml
    }

    fn serialize_after(op: &Operation, xml: &str) -> String {
        op.perform(Document::parse(xml).unwrap(), &EnvVars::new(), &mut NullLog)
            .unwrap()
            .to_xml_string(false)
            .unwrap()
    }

    fn serialize(xml: &str) -> String {
        Document::parse(xml).unwrap().to_xml_string(false).unwrap()
    }

    // ============================================================================
    // substitute property tests
    // ============================================================================

    proptest! {
        /// Property: only text changes; element names and attributes are kept
        #[test]
        fn replace_edits_text_only(children in prop::collection::vec(child(), 1..6)) {
            let op = Operation::replace("b+", false, "z", false);
            let regex = Regex::new("b+").unwrap();
            let original = render(&children, str::to_string);
            let expected = render(&children, |text| regex.replace_all(text, "z").into_owned());
            prop_assert_eq!(serialize_after(&op, &original), serialize(&expected));
        }

        /// Property: a pattern with no match leaves the document identical
        #[test]
        fn replace_without_match_is_identity(children in prop::collection::vec(child(), 0..6)) {
            let op = Operation::replace("q", false, "z", false);
            let xml = render(&children, str::to_string);
            prop_assert_eq!(serialize_after(&op, &xml), serialize(&xml));
        }

        /// Property: a literal replacement is inserted as written, `$` included
        #[test]
        fn unexpanded_replacement_is_literal(
            children in prop::collection::vec(child(), 1..4),
            to in "[a-d$]{1,6}",
        ) {
            let op = Operation::replace("c", false, &to, false);
            let original = render(&children, str::to_string);
            let expected = render(&children, |text| text.replace('c', &to));
            prop_assert_eq!(serialize_after(&op, &original), serialize(&expected));
        }
    }
}
