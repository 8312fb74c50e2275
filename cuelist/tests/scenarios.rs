use cuelist::{
    parse, print_cue_list, print_document, CueReader, Element, Features, Head, KeyFrame, Mixer,
    ParseError, SchemaVersion,
};
use rstest::rstest;

#[derive(Default)]
struct Recorder {
    writes: Vec<(u16, u8)>,
}

impl Mixer for Recorder {
    fn set_channel(&mut self, channel: u16, value: u8) {
        self.writes.push((channel, value));
    }
}

#[test]
fn document_with_one_keyframe() {
    let parsed = parse("X!X@0H04;KF0H0Au;BP0H01;0H1E;kf", Features::default()).unwrap();

    let head = parsed.document.as_ref().and_then(|d| d.head.as_ref()).unwrap();
    assert!(matches!(head, Head::Predefined(_)));
    assert_eq!(head.schema_version(), SchemaVersion::P400);

    assert_eq!(parsed.cue_list.len(), 1);
    let frame = &parsed.cue_list[0];
    assert_eq!(frame.delay_ms, 10);
    assert!(frame.is_closed());

    let data: Vec<_> = frame.channel_data().map(|d| (d.channel, d.value)).collect();
    assert_eq!(data, [(1, 30)]);

    assert_eq!(
        parsed.trace.as_str(),
        "Document\n\
         Head\n\
         \n\
         NEW KeyFrame!\n\
         \n\
         Loading channel data...\n\
         End of the KeyFrame.\n\
         KeyFrame lasts for 10 ms.\n\
         Ch 1: 30\n"
    );
}

#[test]
fn empty_keyframe_then_close_without_open() {
    let result = parse("KfkF", Features::default());

    assert_eq!(result, Err(ParseError::NoOpenKeyFrame { offset: 3 }));
}

#[rstest]
#[case(0, 0)]
#[case(1, 0)]
#[case(7, 0)]
#[case(64, 0)]
#[case(3, 1)]
#[case(5, 4)]
#[case(12, 9)]
fn keyframe_pairs(#[case] count: usize, #[case] writes: usize) {
    let source: String = (0..count)
        .map(|i| {
            let data: String = (0..writes)
                .map(|j| format!("BP0H{:X};0H{:X};", j + 1, (i * writes + j) % 256))
                .collect();
            format!("KF0H{i:X};{data}kf")
        })
        .collect();
    let parsed = parse(&source, Features::default()).unwrap();

    assert_eq!(parsed.cue_list.len(), count);
    assert!(parsed.cue_list.iter().all(KeyFrame::is_closed));
    assert_eq!(
        parsed.cue_list.iter().map(|f| f.delay_ms).collect::<Vec<_>>(),
        (0..count as i32).collect::<Vec<_>>()
    );
    for (i, frame) in parsed.cue_list.iter().enumerate() {
        assert_eq!(frame.children().len(), writes);
        let data: Vec<_> = frame.channel_data().map(|d| (d.channel, d.value)).collect();
        let expected: Vec<_> = (0..writes)
            .map(|j| ((j + 1) as u16, ((i * writes + j) % 256) as u8))
            .collect();
        assert_eq!(data, expected);
    }
    assert_eq!(
        parsed.cue_list.to_string().lines().next(),
        Some(format!("Count of KeyFrames:{count}").as_str())
    );
}

#[rstest]
#[case("KF0H01;KF0H02;kf", 0, 8)]
#[case("KF0H01;BP0H01;0H02;kfKF0H03;KF", 1, 29)]
fn second_open_keyframe_is_rejected(
    #[case] source: &str,
    #[case] index: usize,
    #[case] offset: usize,
) {
    assert_eq!(
        parse(source, Features::default()),
        Err(ParseError::KeyFrameStillOpen { index, offset })
    );
}

#[test]
fn malformed_literal_keeps_defaults() {
    let parsed = parse("KF0H01;BP1H01;kf", Features::default()).unwrap();

    let frame = &parsed.cue_list[0];
    let [Element::ChannelData(data)] = frame.children() else {
        panic!("expected a single channel write, got {:?}", frame.children());
    };
    assert_eq!((data.channel, data.value), (0, 0));
    assert!(frame.is_closed());
}

#[test]
fn printed_cue_list_reads_back_the_same() {
    let source = "KF0H0A;BP0H01;0H1E;BP0H1FF;0H80;kfKf0H20;KF0HFFFFFFFF;BP0H03;0H04;kf";
    let parsed = parse(source, Features::default()).unwrap();
    assert_eq!(parsed.cue_list[2].delay_ms, -1);

    let printed = print_cue_list(&parsed.cue_list);
    let reparsed = parse(&printed, Features::default()).unwrap();

    assert_eq!(reparsed.cue_list, parsed.cue_list);
}

#[test]
fn printed_document_reads_back_the_same() {
    let parsed = parse("X!X@0H06;X@0H2A;X+\"Finale\";", Features::default()).unwrap();
    let document = parsed.document.unwrap();

    let reparsed = parse(&print_document(&document), Features::default()).unwrap();

    assert_eq!(reparsed.document, Some(document));
}

#[test]
fn keyframes_drive_a_mixer() {
    let parsed = parse(
        "KF0H0A;BP0H01;0HFF;BP0H02;0H7F;kfKF0H14;BP0H01;0H00;kf",
        Features::default(),
    )
    .unwrap();

    let mut mixer = Recorder::default();
    for frame in &parsed.cue_list {
        frame.apply(&mut mixer);
    }

    assert_eq!(mixer.writes, [(1, 255), (2, 127), (1, 0)]);
}

#[test]
fn reader_decodes_before_reading() {
    let mut reader = CueReader::new();
    let id = reader
        .add_file(
            "show.cue".into(),
            "X!\nX+ \"Opening Night\" ;\nKF 0H0A;\n  BP 0H01; 0H1E;\nkf\n".into(),
        )
        .unwrap();

    assert_eq!(
        reader.source_text(id),
        "X!X+\"Opening Night\";KF0H0A;BP0H01;0H1E;kf"
    );

    let parsed = reader.parsed(id).unwrap();
    let head = parsed.document.as_ref().and_then(|d| d.head.as_ref()).unwrap();
    assert_eq!(head.title(), "Opening Night");
    assert_eq!(parsed.cue_list[0].delay_ms, 10);
}

#[test]
fn reader_reports_positions_in_decoded_text() {
    let mut reader = CueReader::new();
    let diagnostic = reader
        .add_file("bad.cue".into(), "KF 0H01;\nkf\nkf\n".into())
        .unwrap_err();

    assert_eq!(diagnostic.error_code, "E0001");
    let label = &diagnostic.labels[0];
    let id = label.source.unwrap();
    assert_eq!(reader.source_text(id), "KF0H01;kfkf");
    assert_eq!(label.location, Some(10..11));
}
