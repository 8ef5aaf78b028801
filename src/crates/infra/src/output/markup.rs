use application::sink::SinkError;
use domain::report::BestSellingTrack;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::path::Path;

fn encode_err<E: std::fmt::Display>(e: E) -> SinkError {
    SinkError::Encode(e.to_string())
}

/// `<Track Name=".."><Amount/><Country/><Year/></Track>`
pub fn render_markup(track: &BestSellingTrack) -> Result<Vec<u8>, SinkError> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(encode_err)?;

    let mut root = BytesStart::new("Track");
    root.push_attribute(("Name", track.name.as_str()));
    writer.write_event(Event::Start(root)).map_err(encode_err)?;
    write_element(&mut writer, "Amount", &track.amount.to_string())?;
    write_element(&mut writer, "Country", &track.country)?;
    write_element(&mut writer, "Year", &track.year)?;
    writer
        .write_event(Event::End(BytesEnd::new("Track")))
        .map_err(encode_err)?;

    Ok(writer.into_inner())
}

fn write_element(writer: &mut Writer<Vec<u8>>, tag: &str, text: &str) -> Result<(), SinkError> {
    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(encode_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(encode_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(encode_err)?;
    Ok(())
}

pub fn write_markup(path: &Path, track: &BestSellingTrack) -> Result<(), SinkError> {
    let bytes = render_markup(track)?;
    std::fs::write(path, bytes).map_err(|e| SinkError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn track(name: &str) -> BestSellingTrack {
        BestSellingTrack {
            name: name.to_string(),
            country: "Brazil".to_string(),
            amount: 4,
            year: "2010".to_string(),
        }
    }

    #[test]
    fn test_render_markup() {
        let xml = String::from_utf8(render_markup(&track("Track X")).unwrap()).unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Track Name=\"Track X\"><Amount>4</Amount><Country>Brazil</Country><Year>2010</Year></Track>"
        );
    }

    #[test]
    fn test_render_escapes() {
        let xml = String::from_utf8(render_markup(&track("Rock & <Roll>")).unwrap()).unwrap();
        assert!(xml.contains("Name=\"Rock &amp; &lt;Roll&gt;\""));
    }

    #[test]
    fn test_write_markup_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Brazil_best_selling_2009_and_up.xml");

        write_markup(&path, &track("Track X")).unwrap();
        write_markup(&path, &track("Track Y")).unwrap();

        let xml = std::fs::read_to_string(&path).unwrap();
        assert!(xml.contains("Name=\"Track Y\""));
        assert!(!xml.contains("Track X"));
    }
}
