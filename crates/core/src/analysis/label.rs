use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{MethodKind, ParsedLabel};

/// `<+|->[<Class> <method:with:colons>]`; the class ends at the first whitespace.
static METHOD_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-])\[([^\s\]]+)\s(.+)\]").expect("method label pattern is valid")
});

/// Parse an Objective-C style method label.
///
/// Returns `None` for labels that are not bracketed methods; those are skipped
/// silently by callers rather than treated as errors.
pub fn parse_label(label: &str) -> Option<ParsedLabel> {
    let caps = METHOD_LABEL.captures(label)?;
    let kind = MethodKind::from_symbol(caps.get(1)?.as_str().chars().next()?)?;
    let class_name = caps.get(2)?.as_str().to_string();
    let method = caps.get(3)?.as_str();

    Some(ParsedLabel {
        kind,
        class_name,
        raw_method_name: format!("{}{}", kind.symbol(), method.replace(':', " ")),
        param_count: method.matches(':').count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_class_method_with_two_arguments() {
        let parsed = parse_label("+[Foo bar:baz:]").expect("parse");
        assert_eq!(parsed.kind, MethodKind::ClassMethod);
        assert_eq!(parsed.class_name, "Foo");
        assert_eq!(parsed.param_count, 2);
        assert_eq!(parsed.raw_method_name, "+bar baz ");
        assert_eq!(parsed.params(), "arg2: Any, arg3: Any");
    }

    #[test]
    fn parses_instance_method_without_arguments() {
        let parsed = parse_label("-[NSObject description]").expect("parse");
        assert_eq!(parsed.kind, MethodKind::InstanceMethod);
        assert_eq!(parsed.class_name, "NSObject");
        assert_eq!(parsed.param_count, 0);
        assert_eq!(parsed.raw_method_name, "-description");
        assert_eq!(parsed.signature(), "-description()");
    }

    #[test]
    fn class_name_stops_at_first_space() {
        let parsed = parse_label("-[Foo(Private) setValue:forKey:]").expect("parse");
        assert_eq!(parsed.class_name, "Foo(Private)");
        assert_eq!(parsed.raw_method_name, "-setValue forKey ");
    }

    #[test]
    fn rejects_non_method_labels() {
        let labels =
            ["_main", "sub_100004000", "Foo bar:", "[Foo bar:]", "*[Foo bar]", "-[Foo]", ""];
        for label in labels {
            assert!(parse_label(label).is_none(), "{label} should not parse");
        }
    }
}
