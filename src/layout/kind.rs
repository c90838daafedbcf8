use serde::Serialize;

/// The six-way aggregate behavior of a concrete arc-kind token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AggregateKind {
    EmptyArc,
    Directional,
    Bidirectional,
    NonDirectional,
    Box,
    InlineExpression,
}

/// Maps an arc-kind token to its aggregate behavior. `None` is not an
/// error: unknown kinds are drawn as a plain two-entity line.
pub fn classify(kind: &str) -> Option<AggregateKind> {
    use AggregateKind::*;
    let aggregate = match kind {
        "|||" | "..." | "---" => EmptyArc,
        "->" | "=>" | "=>>" | ">>" | ":>" | "-x" | "<-" | "<=" | "<<=" | "<<" | "<:" | "x-" => {
            Directional
        }
        "note" | "box" | "abox" | "rbox" => Box,
        "<->" | "<=>" | "<<=>>" | "<<>>" | "<:>" => Bidirectional,
        "--" | "==" | ".." | "::" => NonDirectional,
        "alt" | "else" | "opt" | "break" | "par" | "seq" | "strict" | "neg" | "critical"
        | "ignore" | "consider" | "assert" | "loop" | "ref" | "exc" => InlineExpression,
        _ => return None,
    };
    Some(aggregate)
}

/// Kinds rendered with a doubled line (and a nested loop when
/// self-referencing).
pub fn is_double_line(kind: &str) -> bool {
    matches!(kind, ":>" | "::" | "<:>")
}

/// The "lost message" kind: the line stops at 3/4 of the distance to
/// the target.
pub fn is_lost_message(kind: &str) -> bool {
    kind == "-x"
}

/// Style class handed to the rendering backend. Left/right orientation
/// is carried by the emitted coordinates, not the class.
pub fn style_class(kind: &str) -> &'static str {
    match kind {
        "=>" | "<=" | "<=>" | "==" => "method",
        ">>" | "<<" | "<<>>" | ".." => "return",
        "=>>" | "<<=" | "<<=>>" => "callback",
        ":>" | "<:" | "<:>" | "::" => "emphasised",
        "-x" | "x-" => "lost",
        _ => "signal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_kind_classifies() {
        let table = [
            ("...", AggregateKind::EmptyArc),
            ("|||", AggregateKind::EmptyArc),
            ("---", AggregateKind::EmptyArc),
            ("->", AggregateKind::Directional),
            ("-x", AggregateKind::Directional),
            ("<<=", AggregateKind::Directional),
            ("note", AggregateKind::Box),
            ("rbox", AggregateKind::Box),
            ("<->", AggregateKind::Bidirectional),
            ("<<=>>", AggregateKind::Bidirectional),
            ("--", AggregateKind::NonDirectional),
            ("::", AggregateKind::NonDirectional),
            ("alt", AggregateKind::InlineExpression),
            ("loop", AggregateKind::InlineExpression),
            ("exc", AggregateKind::InlineExpression),
        ];
        for (kind, expected) in table {
            assert_eq!(classify(kind), Some(expected), "kind {kind}");
        }
    }

    #[test]
    fn unknown_kinds_fall_through() {
        assert_eq!(classify("~>"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn double_line_kinds() {
        for kind in [":>", "::", "<:>"] {
            assert!(is_double_line(kind), "kind {kind}");
        }
        assert!(!is_double_line("->"));
    }

    #[test]
    fn lost_message_is_only_dash_x() {
        assert!(is_lost_message("-x"));
        assert!(!is_lost_message("x-"));
        assert!(!is_lost_message("->"));
    }
}
