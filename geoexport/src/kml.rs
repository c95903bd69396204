//! KML serialization of a [`Document`].

use std::path::{Path, PathBuf};

use geoexport_types::geo::{GeoPoint, GeoPoint2d};

use crate::document::{Document, Placemark, PlacemarkGeometry};
use crate::error::ExportFailure;
use crate::export::{write_atomically, ExportFormat, Exporter};

/// Namespace of KML 2.2 documents.
pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

const INDENT: &str = "  ";

/// Writes features into a `.kml` file.
#[derive(Debug, Default, Clone, Copy)]
pub struct KmlExporter;

impl Exporter for KmlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Kml
    }

    fn write(&self, document: &Document, path: &Path) -> Result<Vec<PathBuf>, ExportFailure> {
        write_atomically(path, to_kml(document).as_bytes())?;
        Ok(vec![path.to_path_buf()])
    }
}

/// Renders the document as pretty-printed KML text.
pub fn to_kml(document: &Document) -> String {
    let root = Element::new("kml")
        .with_attribute("xmlns", KML_NAMESPACE)
        .with_children(vec![Element::new("Document").with_children(
            document.placemarks().iter().map(placemark).collect(),
        )]);

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    root.write(&mut out, 0);
    out
}

fn placemark(placemark: &Placemark) -> Element {
    let mut children = vec![Element::new("name").with_text(&placemark.name)];
    if let Some(description) = &placemark.description {
        children.push(Element::new("description").with_cdata(description));
    }

    children.push(match &placemark.geometry {
        PlacemarkGeometry::Point(position) => Element::new("Point")
            .with_children(vec![coordinates(std::slice::from_ref(position))]),
        PlacemarkGeometry::LineString(positions) => {
            Element::new("LineString").with_children(vec![coordinates(positions)])
        }
        PlacemarkGeometry::Polygon { outer } => {
            Element::new("Polygon").with_children(vec![Element::new("outerBoundaryIs")
                .with_children(vec![
                    Element::new("LinearRing").with_children(vec![coordinates(outer)])
                ])])
        }
    });

    Element::new("Placemark").with_children(children)
}

fn coordinates(positions: &[GeoPoint2d]) -> Element {
    let tokens: Vec<String> = positions
        .iter()
        .map(|p| format!("{:.6},{:.6},0", p.lon(), p.lat()))
        .collect();
    Element::new("coordinates").with_text(&tokens.join(" "))
}

/// Minimal XML element tree.
#[derive(Debug)]
struct Element {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
    content: Content,
}

#[derive(Debug)]
enum Content {
    Empty,
    Text(String),
    CData(String),
    Children(Vec<Element>),
}

impl Element {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: vec![],
            content: Content::Empty,
        }
    }

    fn with_attribute(mut self, name: &'static str, value: &str) -> Self {
        self.attributes.push((name, value.to_string()));
        self
    }

    fn with_text(mut self, text: &str) -> Self {
        self.content = Content::Text(text.to_string());
        self
    }

    fn with_cdata(mut self, text: &str) -> Self {
        self.content = Content::CData(text.to_string());
        self
    }

    fn with_children(mut self, children: Vec<Element>) -> Self {
        self.content = if children.is_empty() {
            Content::Empty
        } else {
            Content::Children(children)
        };
        self
    }

    fn write(&self, out: &mut String, depth: usize) {
        let indent = INDENT.repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(self.name);
        for (name, value) in &self.attributes {
            out.push_str(&format!(" {name}=\"{}\"", escape(value)));
        }

        match &self.content {
            Content::Empty => out.push_str("/>\n"),
            Content::Text(text) => {
                out.push_str(&format!(">{}</{}>\n", escape(text), self.name));
            }
            Content::CData(text) => {
                out.push_str(&format!(
                    "><![CDATA[{}]]></{}>\n",
                    escape_cdata(text),
                    self.name
                ));
            }
            Content::Children(children) => {
                out.push_str(">\n");
                for child in children {
                    child.write(out, depth + 1);
                }
                out.push_str(&format!("{indent}</{}>\n", self.name));
            }
        }
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `]]>` cannot appear inside a CDATA section, it is split between two sections.
fn escape_cdata(text: &str) -> String {
    text.replace("]]>", "]]]]><![CDATA[>")
}
