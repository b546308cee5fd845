use crate::error::PersistenceError;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;

/// Streaming XML document sink.
///
/// Callers push document events in order; the writer decides how they are
/// rendered. Whitespace is never added implicitly.
pub trait DocumentWriter {
    fn start_document(&mut self) -> Result<(), PersistenceError>;

    fn end_document(&mut self) -> Result<(), PersistenceError>;

    fn start_element(&mut self, name: &str, attributes: &[(&str, &str)])
    -> Result<(), PersistenceError>;

    fn end_element(&mut self, name: &str) -> Result<(), PersistenceError>;

    fn ignorable_whitespace(&mut self, whitespace: &str) -> Result<(), PersistenceError>;
}

/// [`DocumentWriter`] backed by quick-xml. An element closed right after it
/// was opened is written self-closing.
pub struct XmlDocumentWriter<W: Write> {
    writer: Writer<W>,
    pending: Option<BytesStart<'static>>,
}

impl<W: Write> XmlDocumentWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new(inner),
            pending: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn flush_pending(&mut self) -> Result<(), PersistenceError> {
        if let Some(start) = self.pending.take() {
            self.writer
                .write_event(Event::Start(start))
                .map_err(PersistenceError::xml)?;
        }
        Ok(())
    }
}

impl<W: Write> DocumentWriter for XmlDocumentWriter<W> {
    fn start_document(&mut self) -> Result<(), PersistenceError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(PersistenceError::xml)?;
        self.ignorable_whitespace("\n")
    }

    fn end_document(&mut self) -> Result<(), PersistenceError> {
        self.flush_pending()?;
        self.writer.get_mut().flush()?;
        Ok(())
    }

    fn start_element(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
    ) -> Result<(), PersistenceError> {
        self.flush_pending()?;
        let start =
            BytesStart::new(name.to_string()).with_attributes(attributes.iter().copied());
        self.pending = Some(start);
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<(), PersistenceError> {
        match self.pending.take() {
            Some(start) if start.name().as_ref() == name.as_bytes() => self
                .writer
                .write_event(Event::Empty(start))
                .map_err(PersistenceError::xml),
            Some(start) => Err(PersistenceError::Xml(format!(
                "end of <{}> while <{}> is open",
                name,
                String::from_utf8_lossy(start.name().as_ref())
            ))),
            None => self
                .writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(PersistenceError::xml),
        }
    }

    fn ignorable_whitespace(&mut self, whitespace: &str) -> Result<(), PersistenceError> {
        self.flush_pending()?;
        self.writer
            .write_event(Event::Text(BytesText::new(whitespace)))
            .map_err(PersistenceError::xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(events: impl FnOnce(&mut XmlDocumentWriter<Vec<u8>>)) -> String {
        let mut writer = XmlDocumentWriter::new(Vec::new());
        events(&mut writer);
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_empty_element_is_self_closing() {
        let xml = render(|w| {
            w.start_element("root", &[("a", "1")]).unwrap();
            w.start_element("leaf", &[("b", "x")]).unwrap();
            w.end_element("leaf").unwrap();
            w.end_element("root").unwrap();
        });
        assert_eq!(xml, r#"<root a="1"><leaf b="x"/></root>"#);
    }

    #[test]
    fn test_whitespace_opens_element() {
        let xml = render(|w| {
            w.start_element("root", &[]).unwrap();
            w.ignorable_whitespace("\n").unwrap();
            w.end_element("root").unwrap();
        });
        assert_eq!(xml, "<root>\n</root>");
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let xml = render(|w| {
            w.start_element("p", &[("v", "a<b & \"c\"")]).unwrap();
            w.end_element("p").unwrap();
        });
        assert_eq!(xml, r#"<p v="a&lt;b &amp; &quot;c&quot;"/>"#);
    }

    #[test]
    fn test_document_declaration() {
        let xml = render(|w| {
            w.start_document().unwrap();
            w.start_element("root", &[]).unwrap();
            w.end_element("root").unwrap();
            w.end_document().unwrap();
        });
        assert_eq!(xml, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root/>");
    }

    #[test]
    fn test_mismatched_end_is_an_error() {
        let mut w = XmlDocumentWriter::new(Vec::new());
        w.start_element("a", &[]).unwrap();
        assert!(matches!(w.end_element("b"), Err(PersistenceError::Xml(_))));
    }
}
