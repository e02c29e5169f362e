use log::debug;
use winnow::prelude::*;
use winnow::ascii::{space0, space1};
use winnow::combinator::{alt, delimited, eof, opt, terminated};
use winnow::token::{rest, take_until, take_while};

use crate::graph_ast::*;
use crate::label::decode;
use crate::shape_grammar::{classify, leading_id, NodeStatement};

/// Extract the node/edge graph from flowchart source.
///
/// Never fails: statements the shape grammar does not recognise are skipped,
/// and edge endpoints without a definition get a placeholder process node.
pub fn extract(source: &str) -> ParsedGraph {
    let mut graph = ParsedGraph::default();
    let statements = collect_statements(source, &mut graph);

    // Pass 1: node definitions, first occurrence wins.
    for statement in &statements {
        for member in statement.chain.groups.iter().flatten() {
            match classify(member) {
                Some(node) => define_node(&mut graph, node, statement.subgraph),
                None if member.is_empty() => {}
                None => debug!(statement = *member; "Skipping unrecognised node statement"),
            }
        }
    }

    // Pass 2: edges, left to right.
    for statement in &statements {
        let groups = &statement.chain.groups;
        for (i, link) in statement.chain.links.iter().enumerate() {
            let label = link.label.map(decode).unwrap_or_default();
            let targets = endpoints(&groups[i + 1]);
            for source in endpoints(&groups[i]) {
                for &target in &targets {
                    graph.edges.push(EdgeDefinition {
                        source: source.to_string(),
                        target: target.to_string(),
                        label: label.clone(),
                        kind: link.kind,
                        stroke: link.stroke,
                    });
                }
            }
        }
    }

    for edge in &graph.edges {
        for id in [&edge.source, &edge.target] {
            if !graph.nodes.contains_key(id) {
                debug!(id = id.as_str(); "Synthesizing node for undefined edge endpoint");
                graph.nodes.insert(id.clone(), NodeDefinition::placeholder(id));
            }
        }
    }

    graph
}

/// Ids usable as edge endpoints; members without a clean leading id are
/// dropped from the edge.
fn endpoints<'s>(group: &[&'s str]) -> Vec<&'s str> {
    group
        .iter()
        .filter_map(|member| {
            let id = leading_id(member);
            if id.is_none() && !member.is_empty() {
                debug!(endpoint = *member; "Skipping edge endpoint without an id");
            }
            id
        })
        .collect()
}

fn define_node(graph: &mut ParsedGraph, node: NodeStatement, subgraph: Option<usize>) {
    if graph.nodes.contains_key(&node.id) {
        return;
    }
    if let Some(index) = subgraph {
        graph.subgraphs[index].node_ids.push(node.id.clone());
    }
    let label = node
        .label
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| node.id.clone());
    graph.nodes.insert(
        node.id.clone(),
        NodeDefinition {
            id: node.id,
            label,
            category: node.category,
        },
    );
}

/// One `;`-separated statement, split around its connectors.
struct Statement<'s> {
    chain: Chain<'s>,
    /// Innermost subgraph open when the statement appeared.
    subgraph: Option<usize>,
}

/// `groups[i]` and `groups[i + 1]` are joined by `links[i]`. A group holds
/// more than one member when `&` lists several nodes.
#[derive(Debug, PartialEq)]
struct Chain<'s> {
    groups: Vec<Vec<&'s str>>,
    links: Vec<Link<'s>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Link<'s> {
    kind: EdgeKind,
    stroke: EdgeStroke,
    label: Option<&'s str>,
}

/// Walk the source lines, tracking direction and subgraphs on `graph`, and
/// return the statements that may carry nodes or edges.
fn collect_statements<'s>(source: &'s str, graph: &mut ParsedGraph) -> Vec<Statement<'s>> {
    let mut statements = Vec::new();
    let mut open: Vec<usize> = Vec::new();

    for line in source.lines() {
        let mut input = line;
        let kind = source_line(&mut input).unwrap_or(SourceLine::Skip);
        match kind {
            SourceLine::Skip => {}
            SourceLine::Declaration(direction, tail) => {
                if let Some(direction) = direction {
                    graph.direction = direction;
                }
                push_statements(&mut statements, tail, open.last().copied());
            }
            SourceLine::SubgraphStart(header) => {
                let index = graph.subgraphs.len();
                graph.subgraphs.push(subgraph_header(header, index));
                open.push(index);
            }
            SourceLine::SubgraphEnd => {
                open.pop();
            }
            SourceLine::Body(body) => {
                push_statements(&mut statements, body, open.last().copied());
            }
        }
    }

    statements
}

fn push_statements<'s>(
    statements: &mut Vec<Statement<'s>>,
    body: &'s str,
    subgraph: Option<usize>,
) {
    for text in split_statements(body) {
        statements.push(Statement {
            chain: scan_chain(text),
            subgraph,
        });
    }
}

fn subgraph_header(header: &str, index: usize) -> Subgraph {
    let header = header.trim();
    if let Some(node) = classify(header) {
        let label = node
            .label
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| node.id.clone());
        return Subgraph {
            id: node.id,
            label,
            node_ids: Vec::new(),
        };
    }
    let label = decode(header);
    let id = if label.is_empty() {
        format!("subgraph{index}")
    } else {
        label.replace(' ', "_").to_lowercase()
    };
    Subgraph {
        id,
        label,
        node_ids: Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SourceLine<'s> {
    Skip,
    /// Direction plus whatever follows it on the same line.
    Declaration(Option<Direction>, &'s str),
    SubgraphStart(&'s str),
    SubgraphEnd,
    Body(&'s str),
}

fn source_line<'s>(input: &mut &'s str) -> winnow::Result<SourceLine<'s>> {
    space0.parse_next(input)?;
    alt((
        eof.value(SourceLine::Skip),
        "%%".value(SourceLine::Skip),
        declaration.map(|(direction, tail)| SourceLine::Declaration(direction, tail)),
        subgraph_start.map(SourceLine::SubgraphStart),
        (keyword("end"), eof).value(SourceLine::SubgraphEnd),
        directive.value(SourceLine::Skip),
        rest.map(|body: &'s str| SourceLine::Body(body.trim_end())),
    ))
    .parse_next(input)
}

/// Match `word` only when it stands alone.
fn keyword<'s>(word: &'static str) -> impl FnMut(&mut &'s str) -> winnow::Result<&'s str> {
    move |input: &mut &'s str| terminated(word, alt((space1, eof))).parse_next(input)
}

fn declaration<'s>(input: &mut &'s str) -> winnow::Result<(Option<Direction>, &'s str)> {
    alt((keyword("graph"), keyword("flowchart"))).parse_next(input)?;
    let direction = opt(direction).parse_next(input)?;
    let tail = rest.parse_next(input)?;
    Ok((direction, tail.trim()))
}

fn direction(input: &mut &str) -> winnow::Result<Direction> {
    alt((
        "TD".value(Direction::TopDown),
        "TB".value(Direction::TopDown),
        "BT".value(Direction::BottomUp),
        "LR".value(Direction::LeftRight),
        "RL".value(Direction::RightLeft),
    ))
    .parse_next(input)
}

fn subgraph_start<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    keyword("subgraph").parse_next(input)?;
    rest.parse_next(input)
}

fn directive<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    alt((
        keyword("classDef"),
        keyword("class"),
        keyword("style"),
        keyword("linkStyle"),
        keyword("click"),
        keyword("direction"),
    ))
    .parse_next(input)
}

/// Tracks bracket depth and quoting while walking a statement, so that
/// separators inside labels are left alone.
#[derive(Debug, Default)]
struct Nesting {
    depth: usize,
    quoted: bool,
    piped: bool,
}

impl Nesting {
    fn at_top(&self) -> bool {
        self.depth == 0 && !self.quoted && !self.piped
    }

    fn step(&mut self, c: char) {
        match c {
            '"' if !self.piped => self.quoted = !self.quoted,
            _ if self.quoted => {}
            '|' if self.depth == 0 => self.piped = !self.piped,
            '(' | '[' | '{' => self.depth += 1,
            ')' | ']' | '}' => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
    }
}

fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut nesting = Nesting::default();
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if c == separator && nesting.at_top() {
            parts.push(text[start..i].trim());
            start = i + c.len_utf8();
            continue;
        }
        nesting.step(c);
    }
    parts.push(text[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

/// Split a line on `;`, stepping over connectors whole so a `;` inside an
/// edge label stays with its statement.
fn split_statements(body: &str) -> Vec<&str> {
    let mut nesting = Nesting::default();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut pos = 0;

    while let Some(c) = body[pos..].chars().next() {
        if nesting.at_top() {
            if c == ';' {
                parts.push(body[start..pos].trim());
                pos += 1;
                start = pos;
                continue;
            }
            if c == '-' || c == '=' {
                let mut input = &body[pos..];
                if connector(&mut input).is_ok() {
                    pos = body.len() - input.len();
                    continue;
                }
            }
        }
        nesting.step(c);
        pos += c.len_utf8();
    }
    parts.push(body[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

fn scan_chain(statement: &str) -> Chain<'_> {
    let mut segments = Vec::new();
    let mut links = Vec::new();
    let mut nesting = Nesting::default();
    let mut seg_start = 0;
    let mut pos = 0;

    while let Some(c) = statement[pos..].chars().next() {
        if (c == '-' || c == '=') && nesting.at_top() {
            let mut input = &statement[pos..];
            if let Ok(link) = connector(&mut input) {
                segments.push(&statement[seg_start..pos]);
                links.push(link);
                pos = statement.len() - input.len();
                seg_start = pos;
                continue;
            }
        }
        nesting.step(c);
        pos += c.len_utf8();
    }
    segments.push(&statement[seg_start..]);

    let groups = segments
        .into_iter()
        .map(|segment| {
            let members = split_top_level(segment, '&');
            if members.is_empty() { vec![""] } else { members }
        })
        .collect();
    Chain { groups, links }
}

fn connector<'s>(input: &mut &'s str) -> winnow::Result<Link<'s>> {
    alt((text_labelled_link, piped_link)).parse_next(input)
}

/// `A -- text --> B` and `A -- text --- B`.
fn text_labelled_link<'s>(input: &mut &'s str) -> winnow::Result<Link<'s>> {
    "--".parse_next(input)?;
    space1.parse_next(input)?;
    let label = take_until(1.., "--").parse_next(input)?;
    let kind = alt(("-->".value(EdgeKind::Arrow), "---".value(EdgeKind::Line)))
        .parse_next(input)?;
    Ok(Link {
        kind,
        stroke: EdgeStroke::Solid,
        label: Some(label),
    })
}

/// A connector token with an optional `|label|` after it.
fn piped_link<'s>(input: &mut &'s str) -> winnow::Result<Link<'s>> {
    let (kind, stroke) = alt((
        dotted_connector.map(|k| (k, EdgeStroke::Dotted)),
        solid_connector.map(|k| (k, EdgeStroke::Solid)),
        thick_connector.map(|k| (k, EdgeStroke::Thick)),
    ))
    .parse_next(input)?;
    space0.parse_next(input)?;
    let label = opt(pipe_label).parse_next(input)?;
    Ok(Link {
        kind,
        stroke,
        label,
    })
}

fn pipe_label<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    delimited("|", take_while(0.., |c: char| c != '|'), "|").parse_next(input)
}

fn solid_connector(input: &mut &str) -> winnow::Result<EdgeKind> {
    let run = take_while(2.., '-').parse_next(input)?;
    arrow_head(input, run.len())
}

fn thick_connector(input: &mut &str) -> winnow::Result<EdgeKind> {
    let run = take_while(2.., '=').parse_next(input)?;
    arrow_head(input, run.len())
}

fn dotted_connector(input: &mut &str) -> winnow::Result<EdgeKind> {
    ("-", take_while(1.., '.'), "-").parse_next(input)?;
    Ok(match opt(">").parse_next(input)? {
        Some(_) => EdgeKind::Arrow,
        None => EdgeKind::Line,
    })
}

/// `>` ends an arrow of any length; a headless line needs three strokes.
fn arrow_head(input: &mut &str, run: usize) -> winnow::Result<EdgeKind> {
    match opt(">").parse_next(input)? {
        Some(_) => Ok(EdgeKind::Arrow),
        None if run >= 3 => Ok(EdgeKind::Line),
        None => Err(winnow::error::ParserError::from_input(input)),
    }
}
