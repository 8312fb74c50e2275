//! Indented tree view of everything read from a source

use std::fmt::Display;

use crate::{
    cue_list::CueList,
    document::{Document, Head},
    element::{Body, Element, KeyFrame},
    tokenizer::Parsed,
};

impl Parsed {
    /// Displays the document and cue list as an indented tree
    pub fn tree(&self) -> Tree<'_> {
        Tree { parsed: self }
    }
}

/// Tree view of a [`Parsed`] source
#[derive(Debug, Clone, Copy)]
pub struct Tree<'a> {
    parsed: &'a Parsed,
}

impl Display for Tree<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fmt = TreeFormatter {
            node: Node::Root(self.parsed),
            prefix: String::new(),
            child_prefix: String::new(),
        };

        write!(f, "{fmt}")
    }
}

#[derive(Debug, Clone, Copy)]
enum Node<'a> {
    Root(&'a Parsed),
    Document(&'a Document),
    Head(&'a Head),
    Body(&'a Body),
    CueList(&'a CueList),
    KeyFrame(&'a KeyFrame),
    Element(&'a Element),
}

impl<'a> Node<'a> {
    /// Child nodes, `None` for leaves
    fn children(self) -> Option<Vec<Node<'a>>> {
        let elements = |children: &'a [Element]| -> Vec<Node<'a>> {
            children.iter().map(Node::Element).collect()
        };

        match self {
            Node::Root(parsed) => {
                let mut nodes: Vec<_> = parsed.document.iter().map(Node::Document).collect();
                nodes.push(Node::CueList(&parsed.cue_list));
                Some(nodes)
            }
            Node::Document(document) => {
                let mut nodes: Vec<_> = document.head.iter().map(Node::Head).collect();
                nodes.extend(document.body.iter().map(Node::Body));
                Some(nodes)
            }
            Node::Head(_) => None,
            Node::Body(body) => Some(elements(body.children())),
            Node::CueList(list) => Some(list.iter().map(Node::KeyFrame).collect()),
            Node::KeyFrame(frame) => Some(elements(frame.children())),
            Node::Element(element) if element.is_complex() => Some(elements(element.children())),
            Node::Element(_) => None,
        }
    }
}

impl Display for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Root(_) => write!(f, "Source"),
            Node::Document(_) => write!(f, "Document"),
            Node::Head(Head::Predefined(head)) => write!(
                f,
                "PredefinedSchemaHead {:?} #{} {:?}",
                head.schema_version, head.schema_id, head.title
            ),
            Node::Head(Head::Linked(head)) => write!(
                f,
                "LinkedSchemaHead {:?} {:?} {:?}",
                head.schema_version, head.title, head.schema_path
            ),
            Node::Body(_) => write!(f, "Body"),
            Node::CueList(list) => write!(f, "CueList ({} KeyFrames)", list.len()),
            Node::KeyFrame(frame) if frame.is_closed() => write!(f, "{frame}"),
            Node::KeyFrame(frame) => write!(f, "{frame} (open)"),
            Node::Element(element) => write!(f, "{element}"),
        }
    }
}

struct TreeFormatter<'a> {
    node: Node<'a>,
    prefix: String,
    child_prefix: String,
}

impl Display for TreeFormatter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.prefix, self.node)?;

        let Some(children) = self.node.children() else {
            writeln!(f)?;
            return Ok(());
        };

        write!(f, ":")?;
        let Some((last, head)) = children.split_last() else {
            writeln!(f, " (empty)")?;
            return Ok(());
        };

        writeln!(f)?;

        for &node in head {
            let fmt = TreeFormatter {
                node,
                prefix: self.child_prefix.clone() + "|-- ",
                child_prefix: self.child_prefix.clone() + "|   ",
            };

            write!(f, "{fmt}")?;
        }

        let fmt = TreeFormatter {
            node: *last,
            prefix: self.child_prefix.clone() + "`-- ",
            child_prefix: self.child_prefix.clone() + "    ",
        };

        write!(f, "{fmt}")
    }
}
