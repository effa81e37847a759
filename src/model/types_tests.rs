//! Unit tests for model types

#[cfg(test)]
mod tests {
    use crate::model::{Color, File, NewTag, Tag, TagsPayload, ValidationError, validate_tag_name};

    #[test]
    fn test_color_parse_and_display() {
        let color: Color = "#1a2B3c".parse().unwrap();
        assert_eq!(color.components(), (0x1a, 0x2b, 0x3c));
        assert_eq!(color.to_string(), "#1a2b3c");
    }

    #[test]
    fn test_color_rejects_malformed_input() {
        for bad in ["1a2b3c", "#1a2b3", "#1a2b3cd", "#gggggg", ""] {
            assert!(
                matches!(bad.parse::<Color>(), Err(ValidationError::InvalidColor(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_tag_name_rules() {
        assert!(validate_tag_name("rust-lang_2 x").is_ok());
        assert_eq!(validate_tag_name(""), Err(ValidationError::EmptyTagName));
        assert_eq!(
            validate_tag_name("abcdefghijklmnopqrstu"),
            Err(ValidationError::TagNameTooLong { len: 21, max: 20 })
        );
        assert!(matches!(
            validate_tag_name("no/slashes"),
            Err(ValidationError::InvalidTagName(_))
        ));
    }

    #[test]
    fn test_new_tag_parse() {
        let tag = NewTag::parse("music", "#ff0000").unwrap();
        assert_eq!(tag.name(), "music");
        assert_eq!(tag.color(), Color::rgb(0xff, 0, 0));

        assert!(NewTag::parse("music", "red").is_err());
        assert!(NewTag::parse("", "#ff0000").is_err());
    }

    #[test]
    fn test_tag_json_uses_hex_color() {
        let tag = Tag::new(3, "docs", Color::rgb(0, 0x80, 0xff));
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, r##"{"id":3,"name":"docs","color":"#0080ff"}"##);
    }

    #[test]
    fn test_tags_payload_accepts_map_and_list() {
        let map = concat!(
            r##"{"2":{"id":2,"name":"b","color":"#000000"},"##,
            r##""1":{"id":1,"name":"a","color":"#ffffff"}}"##,
        );
        let tags = serde_json::from_str::<TagsPayload>(map).unwrap().into_tags();
        assert_eq!(tags.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2]);

        let list = r##"[{"id":7,"name":"c","color":"#abcdef"}]"##;
        let tags = serde_json::from_str::<TagsPayload>(list).unwrap().into_tags();
        assert_eq!(tags[0].name, "c");
    }

    #[test]
    fn test_file_json_wire_names() {
        let json = r#"{
            "filename": "report.pdf",
            "size": 2048,
            "addTime": "2018-08-23T22:48:59+03:00",
            "tags": null,
            "description": "q3",
            "preview": "/data/resized/report.png"
        }"#;
        let file: File = serde_json::from_str(json).unwrap();
        assert_eq!(file.filename, "report.pdf");
        assert!(file.tags.is_empty());
        assert_eq!(file.preview_ref.as_deref(), Some("/data/resized/report.png"));
    }

    #[test]
    fn test_file_missing_optional_fields() {
        let json = r#"{"filename":"a.txt","addTime":"2020-01-01T00:00:00Z","tags":[3,1]}"#;
        let file: File = serde_json::from_str(json).unwrap();
        assert_eq!(file.size, 0);
        assert!(file.has_tag(1) && file.has_tag(3));
        assert!(file.description.is_empty());
        assert!(file.preview_ref.is_none());
    }
}
