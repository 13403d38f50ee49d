/// One dot-separated token of a rule path: a base name plus any bracket
/// groups trailing it. A token literally ending in `[x]` is a choice
/// placeholder and is kept whole, never split into brackets.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    pub base: String,
    pub brackets: Vec<String>,
}

pub fn parse_path(path: &str) -> Vec<PathSegment> {
    if path.is_empty() {
        return vec![];
    }
    path.split('.').map(parse_segment).collect()
}

fn parse_segment(token: &str) -> PathSegment {
    let open = match token.find('[') {
        Some(open) if !token.ends_with("[x]") => open,
        _ => {
            return PathSegment {
                base: token.to_string(),
                brackets: vec![],
            };
        }
    };

    let brackets = token[open..]
        .split(']')
        .filter(|part| !part.is_empty())
        .map(|part| part.trim_start_matches('[').to_string())
        .collect();

    PathSegment {
        base: token[..open].to_string(),
        brackets,
    }
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_simple() {
        let result = parse_path("component.code");
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].base, "component");
        assert!(result[0].brackets.is_empty());
        assert_eq!(result[1].base, "code");
    }

    #[test]
    fn test_parse_path_empty() {
        assert!(parse_path("").is_empty());
    }

    #[test]
    fn test_parse_path_with_brackets() {
        let result = parse_path("component[Systolic].value[x]");
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].base, "component");
        assert_eq!(result[0].brackets, vec!["Systolic".to_string()]);
        assert_eq!(result[1].base, "value[x]");
        assert!(result[1].brackets.is_empty());
    }

    #[test]
    fn test_parse_path_multiple_brackets() {
        let result = parse_path("subject[Practitioner][Patient]");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].base, "subject");
        assert_eq!(
            result[0].brackets,
            vec!["Practitioner".to_string(), "Patient".to_string()]
        );
    }

    #[test]
    fn test_choice_token_kept_whole() {
        let result = parse_path("value[x]");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].base, "value[x]");
        assert!(result[0].brackets.is_empty());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("string"), "String");
        assert_eq!(capitalize("dateTime"), "DateTime");
        assert_eq!(capitalize(""), "");
    }
}
