use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Node type of a render tree node.
///
/// Covers the node types the wire format documents. Anything else is kept as
/// `Other` so that host documents round-trip without loss.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Doc,
    Paragraph,
    Heading,
    Text,
    Expand,
    NestedExpand,
    Panel,
    BulletList,
    OrderedList,
    ListItem,
    Table,
    TableRow,
    TableHeader,
    TableCell,
    HardBreak,
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Doc => "doc",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::Text => "text",
            NodeKind::Expand => "expand",
            NodeKind::NestedExpand => "nestedExpand",
            NodeKind::Panel => "panel",
            NodeKind::BulletList => "bulletList",
            NodeKind::OrderedList => "orderedList",
            NodeKind::ListItem => "listItem",
            NodeKind::Table => "table",
            NodeKind::TableRow => "tableRow",
            NodeKind::TableHeader => "tableHeader",
            NodeKind::TableCell => "tableCell",
            NodeKind::HardBreak => "hardBreak",
            NodeKind::Other(name) => name,
        }
    }

    /// Block nodes whose children are inline content (one line of text each).
    pub fn is_text_block(&self) -> bool {
        match self {
            NodeKind::Paragraph | NodeKind::Heading => true,
            NodeKind::Doc
            | NodeKind::Text
            | NodeKind::Expand
            | NodeKind::NestedExpand
            | NodeKind::Panel
            | NodeKind::BulletList
            | NodeKind::OrderedList
            | NodeKind::ListItem
            | NodeKind::Table
            | NodeKind::TableRow
            | NodeKind::TableHeader
            | NodeKind::TableCell
            | NodeKind::HardBreak
            | NodeKind::Other(_) => false,
        }
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "doc" => NodeKind::Doc,
            "paragraph" => NodeKind::Paragraph,
            "heading" => NodeKind::Heading,
            "text" => NodeKind::Text,
            "expand" => NodeKind::Expand,
            "nestedExpand" => NodeKind::NestedExpand,
            "panel" => NodeKind::Panel,
            "bulletList" => NodeKind::BulletList,
            "orderedList" => NodeKind::OrderedList,
            "listItem" => NodeKind::ListItem,
            "table" => NodeKind::Table,
            "tableRow" => NodeKind::TableRow,
            "tableHeader" => NodeKind::TableHeader,
            "tableCell" => NodeKind::TableCell,
            "hardBreak" => NodeKind::HardBreak,
            _ => NodeKind::Other(value),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formatting applied to a text leaf (emphasis, strong, color, code, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attrs: Map<String, Value>,
}

impl Mark {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attrs: Map::new(),
        }
    }

    pub fn code() -> Self {
        Self::new("code")
    }

    pub fn strong() -> Self {
        Self::new("strong")
    }

    pub fn em() -> Self {
        Self::new("em")
    }

    pub fn text_color(color: impl Into<String>) -> Self {
        Self::new("textColor").with_attr("color", Value::String(color.into()))
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attrs.insert(key.into(), value);
        self
    }

    /// Color of a `textColor` mark
    pub fn color(&self) -> Option<&str> {
        if self.kind != "textColor" {
            return None;
        }
        self.attrs.get("color").and_then(Value::as_str)
    }
}

/// What a node holds: child nodes, leaf text, or nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Container(Vec<Node>),
    Text { text: String, marks: Vec<Mark> },
    /// Hard breaks, and malformed nodes that carry neither `content` nor `text`
    Empty,
}

/// A render tree node.
///
/// On the wire this is `{ type, attrs?, content?, text?, marks? }`. A node with
/// `content` is a container, otherwise a node with `text` is a leaf. Any other
/// top-level keys (ADF's doc `version`, for one) are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNode", into = "RawNode")]
pub struct Node {
    pub kind: NodeKind,
    pub attrs: Map<String, Value>,
    pub body: Body,
    pub extra: Map<String, Value>,
}

impl Node {
    pub fn container(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            kind,
            attrs: Map::new(),
            body: Body::Container(children),
            extra: Map::new(),
        }
    }

    pub fn doc(children: Vec<Node>) -> Self {
        Self::container(NodeKind::Doc, children)
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::container(NodeKind::Paragraph, children)
    }

    pub fn panel(children: Vec<Node>) -> Self {
        Self::container(NodeKind::Panel, children)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text,
            attrs: Map::new(),
            body: Body::Text {
                text: text.into(),
                marks: Vec::new(),
            },
            extra: Map::new(),
        }
    }

    pub fn marked_text(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Self {
            kind: NodeKind::Text,
            attrs: Map::new(),
            body: Body::Text {
                text: text.into(),
                marks,
            },
            extra: Map::new(),
        }
    }

    pub fn hard_break() -> Self {
        Self {
            kind: NodeKind::HardBreak,
            attrs: Map::new(),
            body: Body::Empty,
            extra: Map::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attrs.insert(key.into(), value);
        self
    }

    pub fn children(&self) -> Option<&[Node]> {
        match &self.body {
            Body::Container(children) => Some(children),
            Body::Text { .. } | Body::Empty => None,
        }
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.body {
            Body::Text { text, .. } => Some(text),
            Body::Container(_) | Body::Empty => None,
        }
    }

    pub fn marks(&self) -> &[Mark] {
        match &self.body {
            Body::Text { marks, .. } => marks,
            Body::Container(_) | Body::Empty => &[],
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self.body, Body::Container(_))
    }

    pub fn is_paragraph(&self) -> bool {
        self.kind == NodeKind::Paragraph
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(Value::as_str)
    }

    /// Copy of this node with its body replaced, keeping everything else
    pub fn with_body(&self, body: Body) -> Self {
        Self {
            kind: self.kind.clone(),
            attrs: self.attrs.clone(),
            body,
            extra: self.extra.clone(),
        }
    }

    /// Copy of this text leaf with different text, keeping kind, attrs and marks
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        self.with_body(Body::Text {
            text: text.into(),
            marks: self.marks().to_vec(),
        })
    }
}

/// Wire shape of a node, used for (de)serialization only
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawNode {
    #[serde(rename = "type")]
    kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attrs: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<Vec<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    marks: Option<Vec<Mark>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        let body = match (raw.content, raw.text) {
            (Some(children), _) => Body::Container(children),
            (None, Some(text)) => Body::Text {
                text,
                marks: raw.marks.unwrap_or_default(),
            },
            (None, None) => Body::Empty,
        };
        Node {
            kind: raw.kind,
            attrs: raw.attrs.unwrap_or_default(),
            body,
            extra: raw.extra,
        }
    }
}

impl From<Node> for RawNode {
    fn from(node: Node) -> Self {
        let attrs = (!node.attrs.is_empty()).then_some(node.attrs);
        match node.body {
            Body::Container(children) => RawNode {
                kind: node.kind,
                attrs,
                content: Some(children),
                text: None,
                marks: None,
                extra: node.extra,
            },
            Body::Text { text, marks } => RawNode {
                kind: node.kind,
                attrs,
                content: None,
                text: Some(text),
                marks: (!marks.is_empty()).then_some(marks),
                extra: node.extra,
            },
            Body::Empty => RawNode {
                kind: node.kind,
                attrs,
                content: None,
                text: None,
                marks: None,
                extra: node.extra,
            },
        }
    }
}
