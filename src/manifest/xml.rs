use super::ManifestComponents;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::trace;

/// Reader for decoded (text) AndroidManifest.xml files
pub struct ManifestReader;

impl ManifestReader {
    pub fn new() -> Self {
        Self
    }

    /// Collect component declarations in document order
    pub fn read(&self, contents: &str) -> Result<ManifestComponents, quick_xml::Error> {
        let mut components = ManifestComponents::new();
        let mut package: Option<String> = None;
        let mut reader = Reader::from_str(contents);
        reader.trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e) => match e.name().as_ref() {
                    b"manifest" => {
                        package = attribute(e, |key| key == "package");
                    }
                    tag @ (b"activity" | b"service" | b"provider" | b"receiver") => {
                        let list = match tag {
                            b"activity" => &mut components.activities,
                            b"service" => &mut components.services,
                            b"provider" => &mut components.providers,
                            _ => &mut components.receivers,
                        };

                        if let Some(name) = attribute(e, |key| key == "android:name" || key.ends_with(":name")) {
                            let class_name = self.resolve_class_name(&name, &package);
                            trace!("{} {}", String::from_utf8_lossy(tag), class_name);
                            list.push(class_name);
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(components)
    }

    /// Resolve a class name, handling relative names like ".MainActivity"
    fn resolve_class_name(&self, name: &str, package: &Option<String>) -> String {
        match package {
            Some(pkg) if name.starts_with('.') => format!("{}{}", pkg, name),
            Some(pkg) if !name.contains('.') => format!("{}.{}", pkg, name),
            None if name.starts_with('.') => name[1..].to_string(),
            _ => name.to_string(),
        }
    }
}

impl Default for ManifestReader {
    fn default() -> Self {
        Self::new()
    }
}

fn attribute(element: &BytesStart<'_>, matches_key: impl Fn(&str) -> bool) -> Option<String> {
    element
        .attributes()
        .filter_map(|a| a.ok())
        .find(|attr| matches_key(&String::from_utf8_lossy(attr.key.as_ref())))
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}
