use super::bpmn_graph_struct::{BpmnGraph, Edge, Node, ValidationError};
use quick_xml::events::BytesStart;
use quick_xml::{Error as QuickXMLError, Reader};
use std::io::BufRead;

fn read_to_string(x: &mut &[u8]) -> String {
    String::from_utf8_lossy(x).to_string()
}

///
/// Error encountered while parsing a BPMN 2.0 XML file
///
#[derive(Debug, Clone)]
pub enum BPMNParseError {
    /// IO error
    IOError(std::rc::Rc<std::io::Error>),
    /// XML error (e.g., incorrect XML format)
    XMLParsingError(QuickXMLError),
    /// Missing key on XML element (with expected key included)
    MissingKey(&'static str),
    /// Encountered no `<process>` tag (i.e., the parsed data was not a BPMN process model)
    NoProcessElement,
    /// The parsed process describes an invalid graph (duplicate IDs or dangling sequence flows)
    Validation(ValidationError),
}

impl std::fmt::Display for BPMNParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse BPMN: {self:?}")
    }
}

impl std::error::Error for BPMNParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BPMNParseError::IOError(e) => Some(e.as_ref()),
            BPMNParseError::XMLParsingError(e) => Some(e),
            BPMNParseError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BPMNParseError {
    fn from(e: std::io::Error) -> Self {
        Self::IOError(std::rc::Rc::new(e))
    }
}

impl From<QuickXMLError> for BPMNParseError {
    fn from(e: QuickXMLError) -> Self {
        Self::XMLParsingError(e)
    }
}

impl From<ValidationError> for BPMNParseError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

fn get_attribute(b: &BytesStart<'_>, key: &'static str) -> Result<String, BPMNParseError> {
    let attr = b
        .try_get_attribute(key)
        .unwrap_or_default()
        .ok_or(BPMNParseError::MissingKey(key))?;
    Ok(read_to_string(&mut attr.value.as_ref()))
}

fn get_optional_attribute(b: &BytesStart<'_>, key: &str) -> Option<String> {
    b.try_get_attribute(key)
        .unwrap_or_default()
        .map(|attr| read_to_string(&mut attr.value.as_ref()))
}

///
/// Import a [`BpmnGraph`] from the given XML reader ([`quick_xml::Reader`])
///
/// Only the first `<process>` element is considered, matching on the local
/// tag name so both prefixed (`bpmn:process`) and default-namespace BPMN
/// files are accepted. Every direct `<sequenceFlow>` child becomes an edge
/// from its `sourceRef` to its `targetRef`; every other direct child element
/// becomes a node carrying its `id`, its element kind (local tag name) and
/// its optional `name`. Nested elements (e.g. `<incoming>`/`<outgoing>`
/// references inside tasks) are ignored.
///
/// Also see [`import_bpmn_file`] and [`import_bpmn_slice`] for convenience
/// variants.
///
pub fn import_bpmn<T>(reader: &mut Reader<T>) -> Result<BpmnGraph, BPMNParseError>
where
    T: BufRead,
{
    reader.config_mut().trim_text(true);
    reader.config_mut().expand_empty_elements = true;
    let mut buf: Vec<u8> = Vec::new();

    let mut nodes: Vec<Node> = Vec::new();
    let mut edges: Vec<Edge> = Vec::new();
    let mut encountered_process_tag = false;
    let mut in_process = false;
    // Nesting depth below the direct children of <process>
    let mut depth: usize = 0;

    loop {
        match reader.read_event_into(&mut buf)? {
            quick_xml::events::Event::Start(b) => {
                let local = b.name().local_name().as_ref().to_vec();
                if !in_process {
                    if local == b"process" {
                        encountered_process_tag = true;
                        in_process = true;
                    }
                } else {
                    if depth == 0 {
                        if local == b"sequenceFlow" {
                            edges.push(Edge {
                                source: get_attribute(&b, "sourceRef")?,
                                target: get_attribute(&b, "targetRef")?,
                                name: get_optional_attribute(&b, "name"),
                                normalized_name: None,
                            });
                        } else {
                            nodes.push(Node {
                                id: get_attribute(&b, "id")?,
                                node_type: read_to_string(&mut local.as_slice()),
                                name: get_optional_attribute(&b, "name"),
                                normalized_name: None,
                            });
                        }
                    }
                    depth += 1;
                }
            }
            quick_xml::events::Event::End(_) => {
                if in_process {
                    if depth == 0 {
                        // End of the first <process>; further processes are ignored
                        break;
                    }
                    depth -= 1;
                }
            }
            quick_xml::events::Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !encountered_process_tag {
        return Err(BPMNParseError::NoProcessElement);
    }
    Ok(BpmnGraph::new(nodes, edges)?)
}

///
/// Import a [`BpmnGraph`] from the given standard buffered reader (implementing [`std::io::BufRead`])
///
/// Also see [`import_bpmn`] for an alternative version of this function, which takes an XML specific reader [`quick_xml::Reader`] instead
///
pub fn import_bpmn_reader<T>(std_reader: &mut T) -> Result<BpmnGraph, BPMNParseError>
where
    T: BufRead,
{
    let mut xml_reader = Reader::from_reader(std_reader);
    import_bpmn(&mut xml_reader)
}

/// Import a [`BpmnGraph`] from a `.bpmn` file at the given filepath
pub fn import_bpmn_file<P: AsRef<std::path::Path>>(path: P) -> Result<BpmnGraph, BPMNParseError> {
    import_bpmn(&mut Reader::from_file(path)?)
}

/// Import a [`BpmnGraph`] from a byte slice of BPMN 2.0 XML
pub fn import_bpmn_slice(xml: &[u8]) -> Result<BpmnGraph, BPMNParseError> {
    import_bpmn(&mut Reader::from_reader(xml))
}
