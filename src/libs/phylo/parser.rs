use super::error::{PhyloError, PhyloResult};
use super::node::NestedNode;
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while},
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, cut, map, map_res, opt, recognize, value},
    error::{context, ContextError, ErrorKind, FromExternalError, ParseError},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded},
    IResult, Offset, Parser,
};
use std::collections::HashSet;

// ================================================================================================
// Error Handling Structures
// ================================================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum DetailedErrorKind {
    Context(&'static str),
    Nom(ErrorKind),
}

/// A custom error type for nom that accumulates context and error kinds.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailedError<'a> {
    pub errors: Vec<(&'a str, DetailedErrorKind)>,
}

impl<'a> ParseError<&'a str> for DetailedError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        DetailedError {
            errors: vec![(input, DetailedErrorKind::Nom(kind))],
        }
    }

    fn append(input: &'a str, kind: ErrorKind, mut other: Self) -> Self {
        other.errors.push((input, DetailedErrorKind::Nom(kind)));
        other
    }
}

impl<'a> ContextError<&'a str> for DetailedError<'a> {
    fn add_context(input: &'a str, ctx: &'static str, mut other: Self) -> Self {
        other.errors.push((input, DetailedErrorKind::Context(ctx)));
        other
    }
}

impl<'a, E> FromExternalError<&'a str, E> for DetailedError<'a> {
    fn from_external_error(input: &'a str, kind: ErrorKind, _e: E) -> Self {
        DetailedError {
            errors: vec![(input, DetailedErrorKind::Nom(kind))],
        }
    }
}

// ================================================================================================
// Intermediate Structure
// ================================================================================================

/// Parsed subtree before names are synthesized.
///
/// Children are parsed before the label that follows them, so unnamed nodes
/// can only be numbered once the whole tree is known. The conversion to
/// `NestedNode` walks this structure in pre-order.
#[derive(Debug, Default)]
struct ParsedNode {
    name: Option<String>,
    children: Vec<ParsedNode>,
}

impl ParsedNode {
    fn collect_names(&self, names: &mut HashSet<String>) {
        if let Some(name) = &self.name {
            names.insert(name.clone());
        }
        for child in &self.children {
            child.collect_names(names);
        }
    }

    fn into_nested(self, inner: &mut InnerNames) -> NestedNode {
        // Parent is numbered before any of its descendants
        let name = match self.name {
            Some(name) => name,
            None => inner.next_name(),
        };

        if self.children.is_empty() {
            NestedNode::leaf(name)
        } else {
            let children = self
                .children
                .into_iter()
                .map(|child| child.into_nested(inner))
                .collect();
            NestedNode::internal(name, children)
        }
    }
}

/// `Inner<k>` name source for one parse call.
///
/// `k` starts at 1 and only grows. Candidates equal to a name already present
/// in the document are skipped.
struct InnerNames {
    counter: usize,
    taken: HashSet<String>,
}

impl InnerNames {
    fn new(taken: HashSet<String>) -> Self {
        Self { counter: 0, taken }
    }

    fn next_name(&mut self) -> String {
        loop {
            self.counter += 1;
            let name = format!("Inner{}", self.counter);
            if !self.taken.contains(&name) {
                return name;
            }
        }
    }
}

// ================================================================================================
// Parsers
// ================================================================================================

// Ignore surrounding spaces, tabs and newlines
fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

// Unquoted labels stop at structural characters and are trimmed.
// Quoted labels keep inner whitespace; a doubled quote stands for one quote.
fn parse_label(input: &str) -> IResult<&str, String, DetailedError<'_>> {
    let unquoted = map(take_while(|c: char| !"():;,[]".contains(c)), |s: &str| {
        s.trim().to_string()
    });

    let single_quoted = delimited(
        char('\''),
        map(
            many0(alt((is_not("'"), value("'", tag("''"))))),
            |parts: Vec<&str>| parts.concat(),
        ),
        char('\''),
    );

    let double_quoted = delimited(
        char('"'),
        map(
            many0(alt((is_not("\""), value("\"", tag("\"\""))))),
            |parts: Vec<&str>| parts.concat(),
        ),
        char('"'),
    );

    context("label", alt((single_quoted, double_quoted, unquoted))).parse(input)
}

// Branch length after a colon, e.g. ":0.123" or ":1e-3"
fn parse_length(input: &str) -> IResult<&str, f64, DetailedError<'_>> {
    context(
        "length",
        preceded(
            ws(char(':')),
            // A colon commits us to a number
            cut(map_res(
                recognize((
                    opt(alt((char('+'), char('-')))),
                    alt((
                        recognize((digit1, opt((char('.'), opt(digit1))))),
                        recognize((char('.'), digit1)),
                    )),
                    opt((
                        alt((char('e'), char('E'))),
                        opt(alt((char('+'), char('-')))),
                        digit1,
                    )),
                )),
                |s: &str| s.parse::<f64>(),
            )),
        ),
    )
    .parse(input)
}

// Bracketed comments such as [&&NHX:S=human] carry nothing we keep
fn parse_comment(input: &str) -> IResult<&str, (), DetailedError<'_>> {
    context(
        "comment",
        map(
            many0(ws(delimited(char('['), take_while(|c: char| c != ']'), char(']')))),
            |_| (),
        ),
    )
    .parse(input)
}

// (child1, child2, ...)Label:Length[Comment]
fn parse_subtree(input: &str) -> IResult<&str, ParsedNode, DetailedError<'_>> {
    let (input, children) = context(
        "children",
        opt(delimited(
            ws(char('(')),
            separated_list1(ws(char(',')), parse_subtree),
            ws(char(')')),
        )),
    )
    .parse(input)?;

    let (input, label) = opt(parse_label).parse(input)?;

    // Branch lengths are validated, then dropped
    let (input, _) = parse_comment(input)?;
    let (input, _length) = opt(parse_length).parse(input)?;
    let (input, _) = parse_comment(input)?;

    let node = ParsedNode {
        name: label.filter(|l| !l.is_empty()),
        children: children.unwrap_or_default(),
    };

    Ok((input, node))
}

// ================================================================================================
// Entry Points
// ================================================================================================

/// Parse a single Newick tree into a nested node tree.
///
/// The tree must end with `;`, optionally followed by whitespace. Branch
/// lengths are checked for syntax and then discarded. Nodes without a label
/// are named `Inner1`, `Inner2`, ... in pre-order.
///
/// # Example
/// ```
/// use phylofam::libs::phylo::parser::parse_newick;
/// use phylofam::libs::phylo::node::NestedNode;
///
/// let tree = parse_newick("((A:1.00000,B:1.00000):3.00000,C:3.00000);").unwrap();
/// let expected = NestedNode::internal(
///     "Inner1",
///     vec![
///         NestedNode::internal("Inner2", vec![NestedNode::leaf("A"), NestedNode::leaf("B")]),
///         NestedNode::leaf("C"),
///     ],
/// );
/// assert_eq!(tree, expected);
///
/// assert!(parse_newick("(A,B:invalid);").is_err());
/// ```
pub fn parse_newick(input: &str) -> PhyloResult<NestedNode> {
    let mut parser = all_consuming((ws(parse_subtree), ws(char(';'))));

    match parser.parse(input) {
        Ok((_, (root, _))) => {
            let mut taken = HashSet::new();
            root.collect_names(&mut taken);
            let mut inner = InnerNames::new(taken);
            Ok(root.into_nested(&mut inner))
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(make_parse_error(input, e)),
        Err(nom::Err::Incomplete(_)) => Err(PhyloError::Parse {
            message: "Incomplete input".to_string(),
            line: 0,
            column: 0,
            snippet: "".to_string(),
        }),
    }
}

// Convert nom errors into a positioned parse error
fn make_parse_error(input: &str, e: DetailedError) -> PhyloError {
    let remaining = e.errors.first().map(|(r, _)| *r).unwrap_or(input);
    let offset = input.offset(remaining);

    let prefix = &input[..offset];
    let line = prefix.chars().filter(|&c| c == '\n').count() + 1;
    let last_newline = prefix.rfind('\n').map(|p| p + 1).unwrap_or(0);
    let column = offset - last_newline + 1;

    let mut message = String::new();
    for (_, kind) in e.errors.iter().rev() {
        match kind {
            DetailedErrorKind::Context(ctx) => {
                message.push_str(&format!("while parsing {}:\n", ctx));
            }
            DetailedErrorKind::Nom(k) => {
                message.push_str(&format!("  error: {:?}\n", k));
            }
        }
    }

    PhyloError::Parse {
        message,
        line,
        column,
        snippet: remaining.chars().take(50).collect(),
    }
}

impl NestedNode {
    /// Parse a Newick string, see [`parse_newick`].
    pub fn from_newick(input: &str) -> PhyloResult<Self> {
        parse_newick(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_names(tree: &NestedNode) -> Vec<String> {
        tree.leaves().iter().map(|n| n.name.to_string()).collect()
    }

    fn all_names(tree: &NestedNode) -> Vec<String> {
        tree.names().iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_parser_simple() {
        let tree = parse_newick("(A,B)C;").unwrap();
        assert_eq!(tree.name.as_label(), Some("C"));
        assert_eq!(tree.children.as_ref().unwrap().len(), 2);
        assert_eq!(leaf_names(&tree), vec!["A", "B"]);
    }

    #[test]
    fn test_parser_inner_names_preorder() {
        let tree = parse_newick("((A,B),(C,(D,E)));").unwrap();
        assert_eq!(
            all_names(&tree),
            vec!["Inner1", "Inner2", "A", "B", "Inner3", "C", "Inner4", "D", "E"]
        );
    }

    #[test]
    fn test_parser_inner_names_skip_explicit() {
        // Inner2 is already used by a leaf
        let tree = parse_newick("((Inner2,B),(C,D)X);").unwrap();
        assert_eq!(
            all_names(&tree),
            vec!["Inner1", "Inner3", "Inner2", "B", "X", "C", "D"]
        );
    }

    #[test]
    fn test_parser_unnamed_leaf() {
        let tree = parse_newick("(A,);").unwrap();
        assert_eq!(all_names(&tree), vec!["Inner1", "A", "Inner2"]);
        assert!(tree.children.as_ref().unwrap()[1].is_leaf());
    }

    #[test]
    fn test_parser_lengths_dropped() {
        let tree = parse_newick("(A:0.1, B:0.2e-1)Root:100;").unwrap();
        assert_eq!(
            tree,
            NestedNode::internal("Root", vec![NestedNode::leaf("A"), NestedNode::leaf("B")])
        );
    }

    #[test]
    fn test_parser_multiline_whitespace() {
        let input = "
        (
            A : 0.1,
            B : 0.2
        ) Root ;
        ";
        let tree = parse_newick(input).unwrap();
        assert_eq!(tree.name.as_label(), Some("Root"));
        assert_eq!(leaf_names(&tree), vec!["A", "B"]);
    }

    #[test]
    fn test_parser_comments() {
        let input = "(('Human':0.1[Comment on Human],Chimp:0.12)Hominidae[&&NHX:S=x]:0.5,Gorilla:0.6)Hominoidea;";
        let tree = parse_newick(input).unwrap();
        assert_eq!(
            all_names(&tree),
            vec!["Hominoidea", "Hominidae", "Human", "Chimp", "Gorilla"]
        );
    }

    #[test]
    fn test_parser_quoted() {
        let tree = parse_newick("('Homo sapiens':0.1, \"Mus musculus\":0.2, 'O''Brien');").unwrap();
        assert_eq!(
            leaf_names(&tree),
            vec!["Homo sapiens", "Mus musculus", "O'Brien"]
        );
    }

    // Internal nodes, asserting each one is binary
    fn count_binary_internal(node: &NestedNode) -> usize {
        match &node.children {
            None => 0,
            Some(children) => {
                assert_eq!(children.len(), 2, "node {} is not binary", node.name);
                1 + children.iter().map(count_binary_internal).sum::<usize>()
            }
        }
    }

    #[test]
    fn test_parser_reads_built_tree() {
        use crate::libs::phylo::{build, writer, BranchPolicy, DistanceMatrix};

        let names = ["s1", "s2", "s3", "s4", "s5", "s6"];
        let n = names.len();
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    values[i * n + j] = ((i + 1) * (j + 1)) as f64 / 7.0 + (i + j) as f64;
                }
            }
        }
        let matrix =
            DistanceMatrix::new(names.iter().map(|s| s.to_string()).collect(), values).unwrap();
        let built = build::average_linkage(&matrix).unwrap();

        for policy in [BranchPolicy::Linkage, BranchPolicy::Ultrametric] {
            let tree = parse_newick(&writer::write_newick(&built, policy)).unwrap();

            assert_eq!(count_binary_internal(&tree), n - 1);
            assert_eq!(count_binary_internal(&tree), built.count_internal());
            assert_eq!(leaf_names(&tree), built.leaves());

            let inner: Vec<String> = all_names(&tree)
                .into_iter()
                .filter(|name| name.starts_with("Inner"))
                .collect();
            let expected: Vec<String> = (1..n).map(|k| format!("Inner{}", k)).collect();
            assert_eq!(inner, expected);
        }
    }

    #[test]
    fn test_parser_error_missing_semicolon() {
        match parse_newick("(A,B)C") {
            Err(PhyloError::Parse { line, column, .. }) => {
                assert_eq!(line, 1);
                assert_eq!(column, 7);
            }
            res => panic!("Expected ParseError, got {:?}", res),
        }
    }

    #[test]
    fn test_parser_error_length() {
        match parse_newick("(A,B:invalid)C;") {
            Err(PhyloError::Parse { line, message, .. }) => {
                assert_eq!(line, 1);
                assert!(message.contains("length"));
            }
            res => panic!("Expected ParseError, got {:?}", res),
        }
    }

    #[test]
    fn test_parser_error_unbalanced() {
        assert!(matches!(
            parse_newick("((A,B),C;"),
            Err(PhyloError::Parse { .. })
        ));
        assert!(matches!(
            parse_newick("(A,B));"),
            Err(PhyloError::Parse { .. })
        ));
        assert!(matches!(
            parse_newick("(A,B); (C,D);"),
            Err(PhyloError::Parse { .. })
        ));
    }
}
