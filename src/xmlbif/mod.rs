//! Loads a `Network` from an XMLBIF 0.3 document.
//!
//! The document is parsed into a small element tree with a pest grammar (`xmlbif.pest`), then the
//! `<NETWORK>` element is walked and every `<VARIABLE>` and `<DEFINITION>` is handed to a
//! `NetworkBuilder`. All structural validation of the network (parents, table sizes, row sums,
//! cycles) is left to the builder.
//!
//! Tag names are matched without regard to ASCII case. `<PROPERTY>` elements and all attributes
//! are ignored.

use crate::init::Initialization;
use crate::model::{Network, NetworkBuilder};
use crate::util::{InferenceError, Result};

use indexmap::IndexMap;
use log::{debug, info};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use std::fs;
use std::path::Path;


#[derive(Parser)]
#[grammar = "xmlbif/xmlbif.pest"]
struct XmlParser;


/// An XML element reduced to what XMLBIF needs: its name, its child elements, and its character
/// data with entities decoded.
#[derive(Debug)]
struct Element {
    name: String,
    children: Vec<Element>,
    text: String
}

impl Element {

    fn from_pair(pair: Pair<Rule>) -> Element {
        let mut inner = pair.into_inner();
        let name = inner.next().map(|p| String::from(p.as_str())).unwrap_or_default();

        let mut children = Vec::new();
        let mut text = String::new();
        for p in inner {
            match p.as_rule() {
                Rule::element => children.push(Element::from_pair(p)),
                Rule::text => text.push_str(&decode_entities(p.as_str())),
                Rule::cdata_text => text.push_str(p.as_str()),
                _ => ()
            }
        }

        Element { name, children, text }
    }

    fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    /// Iterate over the child elements named `tag`
    fn all<'e>(&'e self, tag: &'e str) -> impl Iterator<Item = &'e Element> + 'e {
        self.children.iter().filter(move |c| c.is(tag))
    }

    /// The first child element named `tag`
    fn first(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.is(tag))
    }

    /// The trimmed text of the first child element named `tag`
    fn text_of(&self, tag: &str) -> Option<&str> {
        self.first(tag).map(|c| c.text.trim())
    }
}


/// Replace the predefined XML entities and character references in `raw`. Anything that is not a
/// recognised reference is left as written.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return String::from(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];

        let decoded = rest.find(';').and_then(|end| {
            let entity = &rest[1..end];
            let c = match entity {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                    u32::from_str_radix(&entity[2..], 16).ok().and_then(std::char::from_u32)
                },
                _ if entity.starts_with('#') => {
                    entity[1..].parse::<u32>().ok().and_then(std::char::from_u32)
                },
                _ => None
            };
            c.map(|c| (c, end))
        });

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            },
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);

    out
}


/// A `<DEFINITION>` with its table already parsed
struct Definition {
    given: Vec<String>,
    table: Vec<f64>
}


/// Parse the whitespace-separated probabilities of a `<TABLE>`.
fn parse_table(variable: &str, text: &str) -> Result<Vec<f64>> {
    text.split_whitespace()
        .map(|tok| {
            tok.parse::<f64>().map_err(|_| {
                InferenceError::MalformedNetwork(
                    format!("table of '{}' has a value that is not a number: '{}'", variable, tok)
                )
            })
        })
        .collect()
}


/// Build a `Network` from the `<NETWORK>` element.
fn build_network(network: &Element) -> Result<Network> {
    ///////////////////////////////////////////////////////////////////////
    // 1) Collect the variable declarations
    let mut variables: IndexMap<String, Vec<String>> = IndexMap::new();
    for v in network.all("VARIABLE") {
        let name = match v.text_of("NAME") {
            Some(n) if !n.is_empty() => String::from(n),
            _ => return Err(InferenceError::MalformedNetwork(
                String::from("a <VARIABLE> has no <NAME>")
            ))
        };

        let outcomes: Vec<String> = v.all("OUTCOME").map(|o| String::from(o.text.trim())).collect();

        if variables.insert(name.clone(), outcomes).is_some() {
            return Err(InferenceError::MalformedNetwork(
                format!("variable '{}' is declared twice", name)
            ));
        }
    }

    ///////////////////////////////////////////////////////////////////////
    // 2) Collect the definitions, one per declared variable
    let mut definitions: IndexMap<String, Definition> = IndexMap::new();
    for d in network.all("DEFINITION").chain(network.all("PROBABILITY")) {
        let target = match d.text_of("FOR") {
            Some(f) if !f.is_empty() => String::from(f),
            _ => return Err(InferenceError::MalformedNetwork(
                String::from("a <DEFINITION> has no <FOR>")
            ))
        };

        if !variables.contains_key(&target) {
            return Err(InferenceError::MalformedNetwork(
                format!("definition for undeclared variable '{}'", target)
            ));
        }

        let given = d.all("GIVEN").map(|g| String::from(g.text.trim())).collect();
        let table = match d.first("TABLE") {
            Some(t) => parse_table(&target, &t.text)?,
            None => return Err(InferenceError::MalformedNetwork(
                format!("definition for '{}' has no <TABLE>", target)
            ))
        };

        if definitions.insert(target.clone(), Definition { given, table }).is_some() {
            return Err(InferenceError::MalformedNetwork(
                format!("variable '{}' is defined twice", target)
            ));
        }
    }

    ///////////////////////////////////////////////////////////////////////
    // 3) Hand everything to the builder
    let mut builder = NetworkBuilder::new();
    if let Some(name) = network.text_of("NAME").filter(|n| !n.is_empty()) {
        builder = builder.with_name(name);
    }

    for (name, outcomes) in variables.iter() {
        let def = definitions.swap_remove(name).ok_or_else(|| {
            InferenceError::MalformedNetwork(format!("variable '{}' has no definition", name))
        })?;

        let outcomes: Vec<&str> = outcomes.iter().map(|o| o.as_str()).collect();
        let given: Vec<&str> = def.given.iter().map(|g| g.as_str()).collect();

        builder = builder.with_variable(name, &outcomes, &given, Initialization::Table(def.table));
    }

    builder.build()
}


/// Parse an XMLBIF document held in memory.
///
/// # Errors
/// * `InferenceError::Parse` if `source` is not well-formed XML or has no `<NETWORK>` element
/// * `InferenceError::MalformedNetwork` or `InferenceError::CyclicNetwork` if the network it
///   describes is invalid
pub fn parse_str(source: &str) -> Result<Network> {
    let root = XmlParser::parse(Rule::document, source)
        .map_err(|e| InferenceError::Parse(e.to_string()))?
        .next()
        .and_then(|doc| doc.into_inner().find(|p| p.as_rule() == Rule::element))
        .map(Element::from_pair)
        .ok_or_else(|| InferenceError::Parse(String::from("document has no root element")))?;

    let network = if root.is("NETWORK") {
        &root
    } else {
        root.first("NETWORK").ok_or_else(|| {
            InferenceError::Parse(format!("no <NETWORK> element under <{}>", root.name))
        })?
    };

    let model = build_network(network)?;
    debug!("parsed network {:?} with {} variables", model.name(), model.len());

    Ok(model)
}


/// Load a `Network` from an XMLBIF file.
///
/// # Errors
/// * `InferenceError::Io` if the file cannot be read
/// * any error of `parse_str`
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Network> {
    let path = path.as_ref();
    info!("loading network from {}", path.display());

    let source = fs::read_to_string(path).map_err(|source| {
        InferenceError::Io { path: path.to_path_buf(), source }
    })?;

    parse_str(&source)
}


#[cfg(test)]
mod tests {
    use super::*;

    const CHAIN: &str = r#"<?xml version="1.0" encoding="US-ASCII"?>
<!DOCTYPE BIF [
    <!ELEMENT BIF ( NETWORK )*>
    <!ATTLIST BIF VERSION CDATA #REQUIRED>
]>
<!-- two node chain -->
<BIF VERSION="0.3">
<NETWORK>
<NAME>Chain</NAME>
<VARIABLE TYPE="nature">
    <NAME>A</NAME>
    <OUTCOME>t</OUTCOME>
    <OUTCOME>f</OUTCOME>
    <PROPERTY>position = (0, 0)</PROPERTY>
</VARIABLE>
<VARIABLE TYPE="nature">
    <NAME>B</NAME>
    <OUTCOME>t</OUTCOME>
    <OUTCOME>f</OUTCOME>
</VARIABLE>
<DEFINITION>
    <FOR>B</FOR>
    <GIVEN>A</GIVEN>
    <TABLE> 0.9 0.1
            0.2 0.8 </TABLE>
</DEFINITION>
<DEFINITION>
    <FOR>A</FOR>
    <TABLE>0.3 0.7</TABLE>
</DEFINITION>
</NETWORK>
</BIF>
"#;

    #[test]
    fn chain() {
        let model = parse_str(CHAIN).unwrap();
        assert_eq!(Some("Chain"), model.name());
        assert_eq!(vec!["A", "B"], model.variables().collect::<Vec<_>>());
        assert_eq!(vec!["A"], model.parents("B").unwrap());

        let cpt = model.cpt("B").unwrap();
        assert_eq!(0.2, cpt.value(1, 0).unwrap());
        assert_eq!(0.3, model.cpt("A").unwrap().value(0, 0).unwrap());
    }

    #[test]
    fn entities() {
        assert_eq!("a<b & c>d", decode_entities("a&lt;b &amp; c&gt;d"));
        assert_eq!("\"q\" 'a'", decode_entities("&quot;q&quot; &apos;a&apos;"));
        assert_eq!("AB", decode_entities("&#65;&#x42;"));
        assert_eq!("&unknown; & done", decode_entities("&unknown; & done"));
    }

    #[test]
    fn escaped_names() {
        let doc = r#"<BIF><NETWORK>
            <VARIABLE><NAME>x&amp;y</NAME><OUTCOME>&lt;5</OUTCOME><OUTCOME><![CDATA[>=5]]></OUTCOME></VARIABLE>
            <DEFINITION><FOR>x&amp;y</FOR><TABLE>0.5 0.5</TABLE></DEFINITION>
        </NETWORK></BIF>"#;

        let model = parse_str(doc).unwrap();
        let var = model.get("x&y").unwrap();
        assert_eq!(&["<5", ">=5"], var.outcomes());
    }

    #[test]
    fn self_closing_and_case() {
        let doc = r#"<bif><network><property/>
            <variable><name>A</name><outcome>t</outcome><outcome>f</outcome></variable>
            <definition><for>A</for><table>1 0</table></definition>
        </network></bif>"#;

        let model = parse_str(doc).unwrap();
        assert_eq!(None, model.name());
        assert_eq!(1, model.len());
    }

    #[test]
    fn not_xml() {
        for doc in &["", "<BIF><NETWORK></BIF></NETWORK>", "<BIF>", "just text"] {
            match parse_str(doc) {
                Err(InferenceError::Parse(_)) => (),
                other => panic!("{:?} gave {:?}", doc, other)
            }
        }
    }

    #[test]
    fn no_network() {
        match parse_str("<BIF><OTHER/></BIF>") {
            Err(InferenceError::Parse(msg)) => assert!(msg.contains("NETWORK")),
            other => panic!("wrong result {:?}", other)
        }
    }

    fn malformed(doc: &str) -> String {
        match parse_str(doc) {
            Err(InferenceError::MalformedNetwork(msg)) => msg,
            other => panic!("expected MalformedNetwork, got {:?}", other)
        }
    }

    #[test]
    fn bad_definitions() {
        let var_a = "<VARIABLE><NAME>A</NAME><OUTCOME>t</OUTCOME><OUTCOME>f</OUTCOME></VARIABLE>";
        let def_a = "<DEFINITION><FOR>A</FOR><TABLE>0.5 0.5</TABLE></DEFINITION>";

        // no definition
        let msg = malformed(&format!("<NETWORK>{}</NETWORK>", var_a));
        assert!(msg.contains("no definition"));

        // two definitions
        let msg = malformed(&format!("<NETWORK>{}{}{}</NETWORK>", var_a, def_a, def_a));
        assert!(msg.contains("defined twice"));

        // definition of something undeclared
        let def_b = "<DEFINITION><FOR>B</FOR><TABLE>1</TABLE></DEFINITION>";
        let msg = malformed(&format!("<NETWORK>{}{}{}</NETWORK>", var_a, def_a, def_b));
        assert!(msg.contains("undeclared"));

        // not a number
        let def_nan = "<DEFINITION><FOR>A</FOR><TABLE>0.5 half</TABLE></DEFINITION>";
        let msg = malformed(&format!("<NETWORK>{}{}</NETWORK>", var_a, def_nan));
        assert!(msg.contains("half"));

        // too few values
        let def_short = "<DEFINITION><FOR>A</FOR><TABLE>1.0</TABLE></DEFINITION>";
        malformed(&format!("<NETWORK>{}{}</NETWORK>", var_a, def_short));

        // rows that do not sum to one
        let def_sum = "<DEFINITION><FOR>A</FOR><TABLE>0.5 0.6</TABLE></DEFINITION>";
        malformed(&format!("<NETWORK>{}{}</NETWORK>", var_a, def_sum));

        // missing table
        let def_none = "<DEFINITION><FOR>A</FOR></DEFINITION>";
        malformed(&format!("<NETWORK>{}{}</NETWORK>", var_a, def_none));

        // no outcomes
        malformed("<NETWORK><VARIABLE><NAME>A</NAME></VARIABLE></NETWORK>");
    }

    #[test]
    fn cycle() {
        let doc = r#"<NETWORK>
            <VARIABLE><NAME>A</NAME><OUTCOME>t</OUTCOME><OUTCOME>f</OUTCOME></VARIABLE>
            <VARIABLE><NAME>B</NAME><OUTCOME>t</OUTCOME><OUTCOME>f</OUTCOME></VARIABLE>
            <DEFINITION><FOR>A</FOR><GIVEN>B</GIVEN><TABLE>0.5 0.5 0.5 0.5</TABLE></DEFINITION>
            <DEFINITION><FOR>B</FOR><GIVEN>A</GIVEN><TABLE>0.5 0.5 0.5 0.5</TABLE></DEFINITION>
        </NETWORK>"#;

        match parse_str(doc) {
            Err(InferenceError::CyclicNetwork(names)) => assert_eq!(vec!["A", "B"], names),
            other => panic!("wrong result {:?}", other)
        }
    }

    #[test]
    fn missing_file() {
        match load_file("/nonexistent/network.xml") {
            Err(InferenceError::Io { path, .. }) => assert!(path.ends_with("network.xml")),
            other => panic!("wrong result {:?}", other)
        }
    }
}
