use std::path::PathBuf;
use std::str::FromStr;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

use crate::model::Id;
use crate::sync_error::{Result, SyncError};

static VERSION: &str = env!("CARGO_PKG_VERSION");
static AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
static DESCRIPTION: &str = "Family photos, albums, voice recordings and vignettes from the terminal";

const DASHBOARD: &str = "dashboard";
const PHOTOS: &str = "photos";
const ALBUMS: &str = "albums";
const AUDIO: &str = "audio";
const VIGNETTES: &str = "vignettes";
const FILES: &str = "files";

const LIST: &str = "list";
const UPLOAD: &str = "upload";
const DELETE: &str = "delete";
const CREATE: &str = "create";
const SHOW: &str = "show";
const ADD: &str = "add";
const REMOVE: &str = "remove";
const RECORD: &str = "record";
const IMPORT: &str = "import";
const DOWNLOAD: &str = "download";
const RENAME: &str = "rename";
const EDIT: &str = "edit";

const YES: &str = "yes";
const YES_SHORT: &str = "y";
const ID: &str = "id";
const FOLDER: &str = "folder";
const NAME: &str = "name";
const DESCRIPTION_ARG: &str = "description";
const DESCRIPTION_SHORT: &str = "d";
const ALBUM: &str = "album";
const PHOTO: &str = "photo";
const FILE: &str = "file";
const OUTPUT: &str = "output";
const OUTPUT_SHORT: &str = "o";
const TITLE: &str = "title";
const TITLE_SHORT: &str = "t";
const CONTENT: &str = "content";
const CONTENT_SHORT: &str = "c";
const TOGGLE: &str = "toggle";
const CHRONOLOGICAL: &str = "chronological";

fn id_arg(help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(ID).required(true).index(1).help(help)
}

fn title_arg(help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(TITLE).short(TITLE_SHORT).long(TITLE).takes_value(true).help(help)
}

fn description_arg(help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(DESCRIPTION_ARG)
        .short(DESCRIPTION_SHORT)
        .long(DESCRIPTION_ARG)
        .takes_value(true)
        .help(help)
}

fn content_arg() -> Arg<'static, 'static> {
    Arg::with_name(CONTENT)
        .short(CONTENT_SHORT)
        .long(CONTENT)
        .takes_value(true)
        .help("Text of the vignette")
}

fn group(name: &'static str, about: &'static str) -> App<'static, 'static> {
    SubCommand::with_name(name)
        .about(about)
        .setting(AppSettings::SubcommandRequiredElseHelp)
}

pub fn build_cli() -> App<'static, 'static> {
    App::new("famsync")
        .version(VERSION)
        .author(AUTHOR)
        .about(DESCRIPTION)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(Arg::with_name(YES)
            .short(YES_SHORT)
            .long(YES)
            .global(true)
            .help("Skip confirmation prompts for destructive actions"))
        .subcommand(SubCommand::with_name(DASHBOARD)
            .about("Counts and the four most recent vignettes, recordings and files"))
        .subcommand(group(PHOTOS, "Browse, upload and delete photos")
            .subcommand(SubCommand::with_name(LIST)
                .about("Lists photos, newest first")
                .arg(Arg::with_name(CHRONOLOGICAL)
                    .long(CHRONOLOGICAL)
                    .help("Group the listing by day")))
            .subcommand(SubCommand::with_name(UPLOAD)
                .about("Uploads every image in a folder, one request per file")
                .arg(Arg::with_name(FOLDER)
                    .required(true)
                    .index(1)
                    .help("Folder containing images to be uploaded")))
            .subcommand(SubCommand::with_name(DELETE)
                .about("Deletes a photo")
                .arg(id_arg("Photo id"))))
        .subcommand(group(ALBUMS, "Organise photos into albums")
            .subcommand(SubCommand::with_name(LIST).about("Lists albums with their photo counts"))
            .subcommand(SubCommand::with_name(CREATE)
                .about("Creates an empty album")
                .arg(Arg::with_name(NAME).required(true).index(1).help("Album name"))
                .arg(description_arg("Album description")))
            .subcommand(SubCommand::with_name(SHOW)
                .about("Shows an album and its photos")
                .arg(id_arg("Album id")))
            .subcommand(SubCommand::with_name(DELETE)
                .about("Deletes an album; its photos are kept")
                .arg(id_arg("Album id")))
            .subcommand(SubCommand::with_name(ADD)
                .about("Adds a photo to an album")
                .arg(Arg::with_name(ALBUM).required(true).index(1).help("Album id"))
                .arg(Arg::with_name(PHOTO).required(true).index(2).help("Photo id")))
            .subcommand(SubCommand::with_name(REMOVE)
                .about("Removes a photo from an album")
                .arg(Arg::with_name(ALBUM).required(true).index(1).help("Album id"))
                .arg(Arg::with_name(PHOTO).required(true).index(2).help("Photo id"))))
        .subcommand(group(AUDIO, "Record, import and manage voice recordings")
            .subcommand(SubCommand::with_name(LIST).about("Lists recordings"))
            .subcommand(SubCommand::with_name(RECORD)
                .about("Records from the microphone until Enter is pressed, then asks to save")
                .arg(title_arg("Title for the recording (defaults to the date)")))
            .subcommand(SubCommand::with_name(IMPORT)
                .about("Uploads an existing audio file")
                .arg(Arg::with_name(FILE).required(true).index(1).help("Audio file"))
                .arg(title_arg("Title (defaults to the file name)")))
            .subcommand(SubCommand::with_name(DOWNLOAD)
                .about("Saves a recording's audio to a file")
                .arg(id_arg("Recording id"))
                .arg(Arg::with_name(OUTPUT)
                    .short(OUTPUT_SHORT)
                    .long(OUTPUT)
                    .takes_value(true)
                    .help("Output path (defaults to recording-<id> with an extension guessed from the audio)")))
            .subcommand(SubCommand::with_name(RENAME)
                .about("Changes a recording's title and description")
                .arg(id_arg("Recording id"))
                .arg(title_arg("New title").required(true))
                .arg(description_arg("New description")))
            .subcommand(SubCommand::with_name(DELETE)
                .about("Deletes a recording")
                .arg(id_arg("Recording id"))))
        .subcommand(group(VIGNETTES, "Write short stories and attach photos")
            .subcommand(SubCommand::with_name(LIST).about("Lists vignettes"))
            .subcommand(SubCommand::with_name(SHOW)
                .about("Shows a vignette with its photos")
                .arg(id_arg("Vignette id")))
            .subcommand(SubCommand::with_name(CREATE)
                .about("Creates a vignette")
                .arg(title_arg("Title").required(true))
                .arg(content_arg())
                .arg(Arg::with_name(PHOTO)
                    .short("p")
                    .long(PHOTO)
                    .takes_value(true)
                    .multiple(true)
                    .number_of_values(1)
                    .help("Photo id to attach; repeat for more")))
            .subcommand(SubCommand::with_name(EDIT)
                .about("Edits a vignette")
                .arg(id_arg("Vignette id"))
                .arg(title_arg("New title"))
                .arg(content_arg())
                .arg(Arg::with_name(TOGGLE)
                    .long(TOGGLE)
                    .takes_value(true)
                    .multiple(true)
                    .number_of_values(1)
                    .help("Photo id to attach or detach; repeat for more")))
            .subcommand(SubCommand::with_name(DELETE)
                .about("Deletes a vignette")
                .arg(id_arg("Vignette id"))))
        .subcommand(group(FILES, "Shared documents")
            .subcommand(SubCommand::with_name(LIST).about("Lists files")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CliCommand {
    DASHBOARD,
    PHOTOS,
    ALBUMS,
    AUDIO,
    VIGNETTES,
    FILES,
}

impl FromStr for CliCommand {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            DASHBOARD => Ok(Self::DASHBOARD),
            PHOTOS => Ok(Self::PHOTOS),
            ALBUMS => Ok(Self::ALBUMS),
            AUDIO => Ok(Self::AUDIO),
            VIGNETTES => Ok(Self::VIGNETTES),
            FILES => Ok(Self::FILES),
            other => Err(format!("Command {} was not recognised", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PhotosCmd {
    List { chronological: bool },
    Upload { folder: PathBuf },
    Delete { id: Id },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AlbumsCmd {
    List,
    Create { name: String, description: String },
    Show { id: Id },
    Delete { id: Id },
    Add { album: Id, photo: Id },
    Remove { album: Id, photo: Id },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCmd {
    List,
    Record { title: Option<String> },
    Import { file: PathBuf, title: Option<String> },
    Download { id: Id, output: Option<PathBuf> },
    Rename { id: Id, title: String, description: Option<String> },
    Delete { id: Id },
}

#[derive(Debug, Clone, PartialEq)]
pub enum VignettesCmd {
    List,
    Show { id: Id },
    Create { title: String, content: String, photos: Vec<Id> },
    Edit { id: Id, title: Option<String>, content: Option<String>, toggle: Vec<Id> },
    Delete { id: Id },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dashboard,
    Photos(PhotosCmd),
    Albums(AlbumsCmd),
    Audio(AudioCmd),
    Vignettes(VignettesCmd),
    Files,
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub command: Command,
    pub assume_yes: bool,
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .value_of(name)
        .ok_or_else(|| SyncError::validation(format!("missing <{}>", name)))
}

fn optional(matches: &ArgMatches, name: &str) -> Option<String> {
    matches.value_of(name).map(String::from)
}

fn ids(matches: &ArgMatches, name: &str) -> Vec<Id> {
    matches
        .values_of(name)
        .map(|values| values.map(Id::from).collect())
        .unwrap_or_default()
}

fn action<'m, 'a>(matches: &'m ArgMatches<'a>) -> Result<(&'m str, &'m ArgMatches<'a>)> {
    match matches.subcommand() {
        (name, Some(sub)) => Ok((name, sub)),
        _ => Err(SyncError::validation("No action was provided, run `famsync help` to learn more")),
    }
}

fn unknown(group: &str, name: &str) -> SyncError {
    SyncError::validation(format!("Command {} {} is not valid", group, name))
}

/// `--yes` is global; clap 2 only records it on the level where it was typed.
fn assume_yes(matches: &ArgMatches) -> bool {
    if matches.is_present(YES) {
        return true;
    }
    match matches.subcommand() {
        (_, Some(sub)) => assume_yes(sub),
        _ => false,
    }
}

impl PhotosCmd {
    fn build(matches: &ArgMatches) -> Result<Self> {
        let (name, sub) = action(matches)?;
        match name {
            LIST => Ok(PhotosCmd::List { chronological: sub.is_present(CHRONOLOGICAL) }),
            UPLOAD => Ok(PhotosCmd::Upload { folder: PathBuf::from(required(sub, FOLDER)?) }),
            DELETE => Ok(PhotosCmd::Delete { id: Id::from(required(sub, ID)?) }),
            other => Err(unknown(PHOTOS, other)),
        }
    }
}

impl AlbumsCmd {
    fn build(matches: &ArgMatches) -> Result<Self> {
        let (name, sub) = action(matches)?;
        match name {
            LIST => Ok(AlbumsCmd::List),
            CREATE => Ok(AlbumsCmd::Create {
                name: required(sub, NAME)?.to_string(),
                description: optional(sub, DESCRIPTION_ARG).unwrap_or_default(),
            }),
            SHOW => Ok(AlbumsCmd::Show { id: Id::from(required(sub, ID)?) }),
            DELETE => Ok(AlbumsCmd::Delete { id: Id::from(required(sub, ID)?) }),
            ADD => Ok(AlbumsCmd::Add {
                album: Id::from(required(sub, ALBUM)?),
                photo: Id::from(required(sub, PHOTO)?),
            }),
            REMOVE => Ok(AlbumsCmd::Remove {
                album: Id::from(required(sub, ALBUM)?),
                photo: Id::from(required(sub, PHOTO)?),
            }),
            other => Err(unknown(ALBUMS, other)),
        }
    }
}

impl AudioCmd {
    fn build(matches: &ArgMatches) -> Result<Self> {
        let (name, sub) = action(matches)?;
        match name {
            LIST => Ok(AudioCmd::List),
            RECORD => Ok(AudioCmd::Record { title: optional(sub, TITLE) }),
            IMPORT => Ok(AudioCmd::Import {
                file: PathBuf::from(required(sub, FILE)?),
                title: optional(sub, TITLE),
            }),
            DOWNLOAD => Ok(AudioCmd::Download {
                id: Id::from(required(sub, ID)?),
                output: optional(sub, OUTPUT).map(PathBuf::from),
            }),
            RENAME => Ok(AudioCmd::Rename {
                id: Id::from(required(sub, ID)?),
                title: required(sub, TITLE)?.to_string(),
                description: optional(sub, DESCRIPTION_ARG),
            }),
            DELETE => Ok(AudioCmd::Delete { id: Id::from(required(sub, ID)?) }),
            other => Err(unknown(AUDIO, other)),
        }
    }
}

impl VignettesCmd {
    fn build(matches: &ArgMatches) -> Result<Self> {
        let (name, sub) = action(matches)?;
        match name {
            LIST => Ok(VignettesCmd::List),
            SHOW => Ok(VignettesCmd::Show { id: Id::from(required(sub, ID)?) }),
            CREATE => Ok(VignettesCmd::Create {
                title: required(sub, TITLE)?.to_string(),
                content: optional(sub, CONTENT).unwrap_or_default(),
                photos: ids(sub, PHOTO),
            }),
            EDIT => Ok(VignettesCmd::Edit {
                id: Id::from(required(sub, ID)?),
                title: optional(sub, TITLE),
                content: optional(sub, CONTENT),
                toggle: ids(sub, TOGGLE),
            }),
            DELETE => Ok(VignettesCmd::Delete { id: Id::from(required(sub, ID)?) }),
            other => Err(unknown(VIGNETTES, other)),
        }
    }
}

impl Invocation {
    pub fn build(matches: &ArgMatches) -> Result<Self> {
        let (name, sub) = match matches.subcommand() {
            (name, Some(sub)) => (name, sub),
            _ => return Err(SyncError::validation("No command was provided, run `famsync help` to learn more")),
        };

        let command = match CliCommand::from_str(name).map_err(SyncError::Validation)? {
            CliCommand::DASHBOARD => Command::Dashboard,
            CliCommand::PHOTOS => Command::Photos(PhotosCmd::build(sub)?),
            CliCommand::ALBUMS => Command::Albums(AlbumsCmd::build(sub)?),
            CliCommand::AUDIO => Command::Audio(AudioCmd::build(sub)?),
            CliCommand::VIGNETTES => Command::Vignettes(VignettesCmd::build(sub)?),
            CliCommand::FILES => Command::Files,
        };

        Ok(Invocation { command, assume_yes: assume_yes(matches) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn parse(args: &[&str]) -> Invocation {
        let mut argv = vec!["famsync"];
        argv.extend_from_slice(args);
        let matches = build_cli().get_matches_from_safe(argv).unwrap();
        Invocation::build(&matches).unwrap()
    }

    #[test]
    fn album_membership_commands() {
        assert_eq!(
            parse(&["albums", "add", "3", "17"]).command,
            Command::Albums(AlbumsCmd::Add { album: Id::from("3"), photo: Id::from("17") })
        );
        assert_eq!(
            parse(&["albums", "create", "Summer 2024"]).command,
            Command::Albums(AlbumsCmd::Create { name: "Summer 2024".into(), description: String::new() })
        );
    }

    #[test]
    fn yes_is_picked_up_at_any_level() {
        assert!(parse(&["--yes", "photos", "delete", "4"]).assume_yes);
        assert!(parse(&["albums", "delete", "4", "-y"]).assume_yes);
        assert!(!parse(&["albums", "delete", "4"]).assume_yes);
    }

    #[test]
    fn repeated_photo_flags_keep_their_order() {
        let invocation = parse(&["vignettes", "create", "-t", "Lake house", "-p", "8", "--photo", "2"]);
        assert_matches!(invocation.command, Command::Vignettes(VignettesCmd::Create { photos, .. }) => {
            assert_eq!(photos, vec![Id::from("8"), Id::from("2")]);
        });
    }

    #[test]
    fn missing_action_is_a_usage_error() {
        assert!(build_cli().get_matches_from_safe(vec!["famsync", "albums"]).is_err());
        assert!(build_cli().get_matches_from_safe(vec!["famsync", "albums", "add", "3"]).is_err());
    }

    #[test]
    fn help_names_the_package_authors() {
        let mut help = Vec::new();
        build_cli().write_long_help(&mut help).unwrap();
        let help = String::from_utf8(help).unwrap();
        assert!(help.contains(env!("CARGO_PKG_AUTHORS")));
    }

    #[test]
    fn command_names_round_trip() {
        assert_eq!(CliCommand::from_str("audio"), Ok(CliCommand::AUDIO));
        assert!(CliCommand::from_str("upload").is_err());
    }
}
