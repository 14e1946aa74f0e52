#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::{
    borrow::Cow,
    collections::HashSet,
    fs::File,
    io::{self, Cursor, Read, Seek, Write},
    path::Path,
    result,
};

use bytes::Bytes;
use camino::Utf8Path;
use tracing::debug;
use zip::{read::ZipFile, write::FileOptions, CompressionMethod, ZipArchive, ZipWriter};

pub use crate::errors::{Error, Result};

pub mod errors;
pub mod image;

/// We artificially limit the amount of accepted files to 65535 files per Cbz
/// First as it'd be rather impractical for the user to read such enormous Cbz
/// Also, this size has been chosen as it was the limit of the very first zip spec
pub static MAX_FILE_NUMBER: usize = u16::MAX as usize;

/// Extensions recognized as pages, anything else in an archive (`ComicInfo.xml`, thumbnails db...) is skipped
pub static IMAGE_EXTENSIONS: [&str; 10] = [
    "jpg", "jpeg", "png", "webp", "gif", "bmp", "tif", "tiff", "avif", "jxl",
];

/// Returns `true` when the file name ends with a known image extension (case insensitive)
#[must_use]
pub fn is_image_name(name: &str) -> bool {
    Utf8Path::new(name).extension().is_some_and(|extension| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(extension))
    })
}

/// Strips any directory component, archives created by hand often nest pages in a folder
#[must_use]
pub fn entry_file_name(name: &str) -> &str {
    Utf8Path::new(name).file_name().unwrap_or(name)
}

pub trait Cbz {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait CbzRead: Cbz {
    fn file_names(&self) -> Vec<&str>;

    /// The archive comment, scene releases store the ripper contact in it
    fn comment(&self) -> Option<String>;

    /// Lookup the file by `name` in Cbz and returns a `CbzFile`
    ///
    /// ## Errors
    ///
    /// Fails if the file doesn't exist or its content can't be read
    fn read_by_name(&mut self, name: &str) -> Result<CbzFile<'_>>;

    /// Names of the pages contained in the Cbz, sorted
    fn image_names(&self) -> Vec<String> {
        let mut names = self
            .file_names()
            .into_iter()
            .filter(|name| !name.ends_with('/') && is_image_name(name))
            .map(Into::into)
            .collect::<Vec<String>>();
        names.sort();

        names
    }

    /// Iterate over the pages present in the Cbz, in name order.
    /// If the closure returns an error, this error is returned immediately.
    ///
    /// ## Errors
    ///
    /// Returns an error immediately if the provided closure returns an error
    fn try_for_each_image<F, E>(&mut self, mut f: F) -> result::Result<(), E>
    where
        F: FnMut(Result<CbzFile<'_>>) -> result::Result<(), E>,
    {
        for name in self.image_names() {
            f(self.read_by_name(&name))?;
        }

        Ok(())
    }
}

pub trait CbzWrite {
    fn contains(&self, name: &str) -> bool;

    fn set_comment(&mut self, comment: String);

    /// High level `insert` method, the entry keeps the name given to the insertion
    ///
    /// ## Errors
    ///
    /// Fails if an entry with the same name already exists, otherwise
    /// same behavior as `insert_from_bytes_slice`
    fn insert(&mut self, insertion: CbzWriterInsertion<'_, '_>) -> Result<()> {
        if self.contains(&insertion.name) {
            return Err(Error::CbzDuplicateEntry(insertion.name.into_owned()));
        }

        self.insert_from_bytes_slice(insertion.name.into_owned(), &insertion.bytes)
    }

    /// This is the method ultimately called to insert the bytes into the Cbz
    ///
    /// ## Errors
    ///
    /// This fails if the Cbz writer can't be written or if it's full (i.e. its size equals `MAX_FILE_NUMBER`)
    fn insert_from_bytes_slice(&mut self, filename: String, bytes: &[u8]) -> Result<()>;
}

pub struct CbzFile<'a>(ZipFile<'a>);

impl<'a> CbzFile<'a> {
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// The entry name without its directory
    pub fn file_name(&self) -> &str {
        entry_file_name(self.0.name())
    }

    pub fn size(&self) -> u64 {
        self.0.size()
    }

    /// Convert the file convent to  `Bytes`
    ///
    /// ## Errors
    ///
    /// Fails if file size is too large to fit a `usize` on host machine
    /// or if the content can't be read
    pub fn to_bytes(&mut self) -> Result<Bytes> {
        let mut buf = Vec::with_capacity(
            self.size()
                .try_into()
                .map_err(|_| Error::CbzFileSizeConversion)?,
        );

        self.0.read_to_end(&mut buf)?;

        Ok(buf.into())
    }
}

impl<'a> Read for CbzFile<'a> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl<'a> From<ZipFile<'a>> for CbzFile<'a> {
    fn from(zip_file: ZipFile<'a>) -> Self {
        Self(zip_file)
    }
}

#[derive(Debug)]
pub struct CbzReader<R> {
    archive: ZipArchive<R>,
}

impl<R> CbzReader<R> {
    pub fn new(archive: ZipArchive<R>) -> Self {
        Self { archive }
    }
}

impl<R> CbzReader<R>
where
    R: Read + Seek,
{
    /// Creates `CbzReader` from a `Read`
    ///
    /// ## Errors
    ///
    /// Fails if the underlying `ZipArchive` can't be created
    pub fn from_reader(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)?;

        Ok(Self::new(archive))
    }
}

impl CbzReader<File> {
    /// Creates `CbzReader` from a path
    ///
    /// ## Errors
    ///
    /// Fails if the underlying `ZipArchive` can't be created
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;

        Self::from_reader(file)
    }
}

impl<'b> CbzReader<Cursor<&'b [u8]>> {
    /// Creates `CbzReader` from a bytes slice
    ///
    /// ## Errors
    ///
    /// Fails if the underlying `ZipArchive` can't be created
    pub fn from_bytes_slice(bytes: &'b [u8]) -> Result<Self> {
        let cursor = Cursor::new(bytes);

        Self::from_reader(cursor)
    }
}

impl<R> Cbz for CbzReader<R>
where
    R: Read + Seek,
{
    fn len(&self) -> usize {
        self.archive.len()
    }
}

impl<R> CbzRead for CbzReader<R>
where
    R: Read + Seek,
{
    fn file_names(&self) -> Vec<&str> {
        self.archive.file_names().collect()
    }

    fn comment(&self) -> Option<String> {
        let comment = String::from_utf8_lossy(self.archive.comment());

        (!comment.trim().is_empty()).then(|| comment.into_owned())
    }

    fn read_by_name(&mut self, name: &str) -> Result<CbzFile<'_>> {
        let archive_file = self.archive.by_name(name)?;

        Ok(archive_file.into())
    }
}

pub struct CbzWriter<W: Write + Seek> {
    archive: ZipWriter<W>,
    names: HashSet<String>,
    file_options: FileOptions,
}

impl<W> CbzWriter<W>
where
    W: Write + Seek,
{
    /// Pages are already compressed images, entries are stored as-is unless told otherwise
    pub fn new(archive: ZipWriter<W>) -> Self {
        Self {
            archive,
            names: HashSet::new(),
            file_options: FileOptions::default().compression_method(CompressionMethod::Stored),
        }
    }

    /// Creates a `CbzWriter` from a `Write`
    pub fn from_writer(writer: W) -> Self {
        let archive = ZipWriter::new(writer);

        Self::new(archive)
    }

    /// Terminates the Cbz archiving, called on drop anyway but error can't be handled
    ///
    /// ## Errors
    ///
    /// Same errors as the underlying `ZipWriter::finish` method
    pub fn finish(&mut self) -> Result<CbzWriterFinished<W>> {
        let writer = self.archive.finish()?;

        Ok(CbzWriterFinished::new(writer))
    }
}

impl<W> CbzWriter<W>
where
    W: Read + Write + Seek,
{
    /// Reopens a finished archive, its entries are kept and new ones go after them
    ///
    /// ## Errors
    ///
    /// Fails if `inner` isn't a zip archive
    pub fn from_existing(mut inner: W) -> Result<Self> {
        let names = ZipArchive::new(&mut inner)?
            .file_names()
            .map(str::to_string)
            .collect();
        let archive = ZipWriter::new_append(inner)?;

        Ok(Self {
            names,
            ..Self::new(archive)
        })
    }
}

impl CbzWriter<File> {
    /// Creates the archive file directly on disk
    ///
    /// ## Errors
    ///
    /// Fails if the file can't be created
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path.as_ref())?;

        Ok(Self::from_writer(file))
    }

    /// Opens an archive on disk to update it
    ///
    /// ## Errors
    ///
    /// Fails if the file can't be opened or isn't a zip archive
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::options().read(true).write(true).open(path.as_ref())?;

        Self::from_existing(file)
    }
}

impl Default for CbzWriter<Cursor<Vec<u8>>> {
    fn default() -> Self {
        Self::from_writer(Cursor::new(Vec::new()))
    }
}

impl<W> Cbz for CbzWriter<W>
where
    W: Write + Seek,
{
    fn len(&self) -> usize {
        self.names.len()
    }
}

impl<W> CbzWrite for CbzWriter<W>
where
    W: Write + Seek,
{
    fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    fn set_comment(&mut self, comment: String) {
        self.archive.set_comment(comment);
    }

    fn insert_from_bytes_slice(&mut self, filename: String, bytes: &[u8]) -> Result<()> {
        if self.names.len() >= MAX_FILE_NUMBER {
            return Err(Error::CbzTooLarge(MAX_FILE_NUMBER));
        }

        self.archive
            .start_file(filename.as_str(), self.file_options)?;

        self.archive.write_all(bytes)?;

        debug!("inserted {filename} into cbz");
        self.names.insert(filename);

        Ok(())
    }
}

pub struct CbzWriterInsertion<'a, 'b> {
    name: Cow<'a, str>,
    bytes: Cow<'b, [u8]>,
}

pub struct CbzWriterInsertionBuilder<'a, 'b> {
    name: &'a str,
    bytes: Option<Cow<'b, [u8]>>,
}

impl<'a, 'b> CbzWriterInsertionBuilder<'a, 'b> {
    /// The inserted entry keeps the file name (directories are dropped)
    pub fn from_filename(filename: &'a (impl AsRef<str> + ?Sized)) -> Self {
        Self {
            name: entry_file_name(filename.as_ref()),
            bytes: None,
        }
    }

    #[must_use]
    pub fn set_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.bytes = Some(bytes.into().into());

        self
    }

    /// Set the `bytes` field from the provided `Read`
    ///
    /// ## Errors
    ///
    /// Can fail when reading the provided `Read`
    pub fn set_bytes_from_reader(mut self, mut reader: impl Read) -> Result<Self> {
        let mut buf = Vec::new();

        reader.read_to_end(&mut buf)?;

        self.bytes = Some(buf.into());

        Ok(self)
    }

    /// Builds a `CbzWriterInsertion`
    ///
    /// ## Errors
    ///
    /// Fails if the `bytes` field hasn't been populated or if the name has no extension
    pub fn build(self) -> Result<CbzWriterInsertion<'a, 'b>> {
        let Some(bytes) = self.bytes else {
            return Err(Error::CbzInsertionNoBytes);
        };

        if Utf8Path::new(self.name)
            .extension()
            .map_or(true, str::is_empty)
        {
            return Err(Error::CbzInsertionNoExtension(self.name.to_string()));
        }

        Ok(CbzWriterInsertion {
            name: self.name.into(),
            bytes,
        })
    }
}

pub struct CbzWriterFinished<W> {
    writer: W,
}

impl<W> CbzWriterFinished<W> {
    fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl CbzWriterFinished<File> {
    /// Cuts whatever the previous archive left past the new end, e.g. a longer comment
    ///
    /// ## Errors
    ///
    /// Fails if the file can't be resized
    pub fn truncate(mut self) -> Result<()> {
        let end = self.writer.stream_position()?;
        self.writer.set_len(end)?;

        Ok(())
    }
}

impl<T: AsRef<[u8]>> AsRef<[u8]> for CbzWriterFinished<Cursor<T>> {
    fn as_ref(&self) -> &[u8] {
        self.writer.get_ref().as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(writer: &mut CbzWriter<Cursor<Vec<u8>>>, name: &str, bytes: &[u8]) -> Result<()> {
        let insertion = CbzWriterInsertionBuilder::from_filename(name)
            .set_bytes(bytes.to_vec())
            .build()?;
        writer.insert(insertion)
    }

    #[test]
    fn keeps_names_and_comment() {
        let mut writer = CbzWriter::default();
        insert(&mut writer, "Title - p002.jpg", b"two").unwrap();
        insert(&mut writer, "nested/Title - p001.jpg", b"one").unwrap();
        insert(&mut writer, "ComicInfo.xml", b"<xml/>").unwrap();
        writer.set_comment("ripper@example.com".to_string());
        let finished = writer.finish().unwrap();

        let mut reader = CbzReader::from_bytes_slice(finished.as_ref()).unwrap();
        assert_eq!(reader.len(), 3);
        assert_eq!(reader.comment().as_deref(), Some("ripper@example.com"));
        assert_eq!(
            reader.image_names(),
            vec!["Title - p001.jpg".to_string(), "Title - p002.jpg".to_string()]
        );

        let mut contents = Vec::new();
        reader
            .try_for_each_image(|file| {
                contents.push(file?.to_bytes()?.to_vec());
                Ok::<(), Error>(())
            })
            .unwrap();
        assert_eq!(contents, vec![b"one".to_vec(), b"two".to_vec()]);
    }

    #[test]
    fn rejects_duplicates_and_missing_extensions() {
        let mut writer = CbzWriter::default();
        insert(&mut writer, "p001.png", b"a").unwrap();
        assert!(matches!(
            insert(&mut writer, "other/p001.png", b"b"),
            Err(Error::CbzDuplicateEntry(name)) if name == "p001.png"
        ));
        assert!(matches!(
            insert(&mut writer, "p002", b"c"),
            Err(Error::CbzInsertionNoExtension(_))
        ));
        assert!(matches!(
            CbzWriterInsertionBuilder::from_filename("p003.png").build(),
            Err(Error::CbzInsertionNoBytes)
        ));
    }

    #[test]
    fn recognizes_images() {
        assert!(is_image_name("a - p001.JPG"));
        assert!(is_image_name("cover.webp"));
        assert!(!is_image_name("ComicInfo.xml"));
        assert!(!is_image_name("no-extension"));
    }

    #[test]
    fn empty_comment_is_none() {
        let mut writer = CbzWriter::default();
        insert(&mut writer, "p001.png", b"a").unwrap();
        let finished = writer.finish().unwrap();
        let reader = CbzReader::from_bytes_slice(finished.as_ref()).unwrap();
        assert!(reader.comment().is_none());
    }

    #[test]
    fn reopened_archives_keep_their_entries() {
        let mut writer = CbzWriter::default();
        insert(&mut writer, "p001.png", b"a").unwrap();
        writer.set_comment("old@example.com".to_string());
        let finished = writer.finish().unwrap();

        let mut writer = CbzWriter::from_existing(Cursor::new(finished.as_ref().to_vec())).unwrap();
        assert!(writer.contains("p001.png"));
        assert!(matches!(
            insert(&mut writer, "p001.png", b"b"),
            Err(Error::CbzDuplicateEntry(_))
        ));
        insert(&mut writer, "p002.png", b"c").unwrap();
        writer.set_comment("new@example.com".to_string());
        let finished = writer.finish().unwrap();

        let reader = CbzReader::from_bytes_slice(finished.as_ref()).unwrap();
        assert_eq!(reader.len(), 2);
        assert_eq!(reader.comment().as_deref(), Some("new@example.com"));
    }
}
