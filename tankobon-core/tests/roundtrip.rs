use tankobon_core::{
    number_body_pages, BatchContext, BracketType, ChapterNumbering, ChapterRange, FormatOptions,
    Formatter, ImageQuality, MatchOptions, Matcher, Number, PageNumber, PageSpan,
    PublicationType, ReleaseMetadata,
};

fn necromancer_maid() -> ReleaseMetadata {
    let mut record = ReleaseMetadata::new("Necromancer Maid", "nao");
    record.manga_volume = Some(Number::new(3));
    record.chapter = Some(
        ChapterRange::new(Number::new(26), PageSpan::from_start(1)).with_title("Princess Chloe"),
    );
    record.page_number = PageNumber::single(1);
    record.publisher = Some("Comikey".to_string());
    record.publication_type = PublicationType::Web;
    record
}

fn assert_encoded_fields_survive(record: &ReleaseMetadata, options: &FormatOptions) {
    let context = BatchContext::collect([record]);
    let image_filename = Formatter::new(options, &context)
        .image_filename(record)
        .unwrap();

    let parsed = Matcher::pages(
        MatchOptions::new(record.manga_title.clone()).with_numbering(options.numbering),
    )
    .match_name(&format!("{image_filename}.jpg"))
    .unwrap();

    assert_eq!(parsed.title.as_deref(), Some(record.manga_title.as_str()), "{image_filename}");
    assert_eq!(parsed.chapter, record.chapter_number(), "{image_filename}");
    assert_eq!(parsed.volume, record.manga_volume, "{image_filename}");
    assert_eq!(parsed.page, Some(record.effective_page()), "{image_filename}");
    assert_eq!(parsed.publisher, record.publisher, "{image_filename}");
    assert_eq!(parsed.group.as_deref(), Some(record.ripper_credit.as_str()), "{image_filename}");
    assert_eq!(parsed.quality, record.image_quality, "{image_filename}");
    if record.publisher.is_some() {
        assert_eq!(
            parsed.chapter_title.as_deref(),
            record.chapter_title(),
            "{image_filename}"
        );
    }
}

#[test]
fn image_names_parse_back() {
    let options = FormatOptions::default();
    let mut record = necromancer_maid();
    assert_encoded_fields_survive(&record, &options);

    record.image_quality = Some(ImageQuality::Hq);
    record.page_number = PageNumber::spread(12, 13);
    assert_encoded_fields_survive(&record, &options);

    for publication_type in PublicationType::ALL {
        record.publication_type = publication_type;
        assert_encoded_fields_survive(&record, &options);
    }

    record.publisher = None;
    record.publication_type = PublicationType::None;
    record.is_cover = true;
    assert_encoded_fields_survive(&record, &options);
}

#[test]
fn bonus_names_parse_back() {
    let options = FormatOptions {
        numbering: ChapterNumbering::Bonus,
        ..FormatOptions::default()
    };

    let mut record = necromancer_maid();
    record.chapter = Some(ChapterRange::new(
        Number::with_fraction(26, 5),
        PageSpan::from_start(1),
    ));
    assert_encoded_fields_survive(&record, &options);

    record.chapter = Some(ChapterRange::new(
        Number::with_fraction(26, 2),
        PageSpan::from_start(1),
    ));
    assert_encoded_fields_survive(&record, &options);
}

#[test]
fn matched_names_format_to_the_canonical_name() {
    let options = FormatOptions::default();
    let parsed = Matcher::pages(MatchOptions::new("The Necromancer Maid"))
        .match_name("Necromancer Maid - c026 (v03) - p001 [web] [Princess Chloe] [Comikey] [nao].jpg")
        .unwrap();
    let record = parsed.into_metadata("Necromancer Maid", "someone else");
    let context = BatchContext::collect([&record]);

    assert_eq!(record.ripper_credit, "nao");
    assert_eq!(
        Formatter::new(&options, &context)
            .image_filename(&record)
            .unwrap(),
        "Necromancer Maid - c026 (v03) - p001 [web] [Princess Chloe] [Comikey] [nao]"
    );
}

#[test]
fn omnibus_archive_name() {
    let mut record = ReleaseMetadata::new("Test Manga", "nao");
    record.manga_volume = Some(Number::new(1));
    record.manga_year = Some(2023);
    record.bracket_type = BracketType::Round;
    record.extra_metadata = Some("Omnibus 2-in-1".to_string());

    let options = FormatOptions::default();
    let context = BatchContext::collect([&record]);
    let archive_filename = Formatter::new(&options, &context)
        .archive_filename(&record)
        .unwrap();
    assert_eq!(
        archive_filename,
        "Test Manga v01 (2023) (Omnibus 2-in-1) (Digital) (nao)"
    );

    let parsed = Matcher::archives(MatchOptions::new("Test Manga"))
        .match_name(&format!("{archive_filename}.cbz"))
        .unwrap();
    assert_eq!(parsed.extra_metadata.as_deref(), Some("Omnibus 2-in-1"));
    assert_eq!(parsed.bracket_type, Some(BracketType::Round));
    assert_eq!(parsed.year, Some(2023));
    assert_eq!(parsed.group.as_deref(), Some("nao"));
}

#[test]
fn revisions_only_mark_archives() {
    let options = FormatOptions::default();
    let mut record = necromancer_maid();
    let context = BatchContext::collect([&record]);
    let formatter = Formatter::new(&options, &context);

    let first = formatter.format(&record).unwrap();
    assert!(!first.archive_filename.contains("(v1)"));
    assert!(!first.image_filename.contains("{r"));

    record.revision = 2;
    let second = formatter.format(&record).unwrap();
    assert_eq!(second.archive_filename, "Necromancer Maid v03 (Digital) [nao] (v2)");
    assert_eq!(second.image_filename, first.image_filename);

    let parsed = Matcher::archives(MatchOptions::new("Necromancer Maid"))
        .match_name(&second.archive_filename)
        .unwrap();
    assert_eq!(parsed.revision, Some(2));

    record.publication_type = PublicationType::None;
    record.manga_year = Some(2023);
    for (bracket_type, expected) in [
        (BracketType::Round, "Necromancer Maid v03 (2023) (nao) (v2)"),
        (BracketType::Curly, "Necromancer Maid v03 (2023) {nao} (v2)"),
    ] {
        record.bracket_type = bracket_type;
        let archive_filename = formatter.archive_filename(&record).unwrap();
        assert_eq!(archive_filename, expected);

        let parsed = Matcher::archives(MatchOptions::new("Necromancer Maid").with_limit_to("nao"))
            .match_name(&archive_filename)
            .unwrap();
        assert_eq!(parsed.group.as_deref(), Some("nao"), "{archive_filename}");
        assert_eq!(parsed.extra_metadata, None, "{archive_filename}");
        assert_eq!(parsed.revision, Some(2), "{archive_filename}");
        assert_eq!(parsed.bracket_type, Some(bracket_type), "{archive_filename}");
    }

    let parsed = Matcher::archives(MatchOptions::new("Necromancer Maid"))
        .match_name("Necromancer Maid v03 (2023) (Omnibus) (nao)")
        .unwrap();
    assert_eq!(parsed.extra_metadata.as_deref(), Some("Omnibus"));
    assert_eq!(parsed.group.as_deref(), Some("nao"));
}

#[test]
fn padding_is_shared_by_the_batch() {
    let mut small = necromancer_maid();
    small.manga_volume = Some(Number::new(7));
    let mut large = necromancer_maid();
    large.manga_volume = Some(Number::new(100));
    large.page_number = PageNumber::single(1002);

    let options = FormatOptions::default();
    let context = BatchContext::collect([&small, &large]);
    let formatter = Formatter::new(&options, &context);
    let formatted = formatter.format(&small).unwrap();

    assert!(formatted.image_filename.contains("(v007) - p0001 "), "{}", formatted.image_filename);
    assert!(formatted.archive_filename.starts_with("Necromancer Maid v007 "));

    let alone = BatchContext::collect([&small]);
    assert!(Formatter::new(&options, &alone)
        .image_filename(&small)
        .unwrap()
        .contains("(v07) - p001 "));
}

#[test]
fn covers_are_page_zero() {
    let mut record = necromancer_maid();
    record.page_number = PageNumber::single(7);
    record.is_cover = true;

    let options = FormatOptions::default();
    let context = BatchContext::collect([&record]);
    assert_eq!(
        Formatter::new(&options, &context)
            .image_filename(&record)
            .unwrap(),
        "Necromancer Maid - c026 (v03) - p000 [Cover] [web] [Princess Chloe] [Comikey] [nao]"
    );

    assert_eq!(number_body_pages(&[false, true, false], 1), vec![1, 0, 2]);
}
