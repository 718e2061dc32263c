#![deny(unsafe_code)]

//! Command-line management for the mailbox tree, the script-facing
//! counterpart of the daemon. Operates on the filesystem directly; the
//! running broker picks the changes up through its directory watches.

use std::io::Read;
use std::process;

use structopt::StructOpt;

use postbox::types::is_valid_id;
use postbox::{Admin, Mailbox, Result};
use postbox_conf::{Options, Settings};

#[derive(StructOpt, Debug)]
#[structopt(name = "postbox-ctl", about = "Server-side postbox administration from scripts and command lines")]
struct Ctl {
    #[structopt(flatten)]
    opts: Options,
    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Provision a session or adjust its channel permissions
    Session {
        /// Session being manipulated
        #[structopt(name = "SESSION", parse(try_from_str = parse_id))]
        session: String,

        /// Channel to be manipulated (argument can be repeated)
        #[structopt(long = "channel", number_of_values = 1, parse(try_from_str = parse_id))]
        channels: Vec<String>,

        /// Allow the session to read the given channels; absent means revoke
        #[structopt(long)]
        readable: bool,

        /// Allow the session to write to the given channels; absent means revoke
        #[structopt(long)]
        writable: bool,

        /// Cleanup/de-register this session
        #[structopt(long)]
        remove: bool,
    },
    /// Publish a message to a channel
    Publish {
        /// Channel to which to send the message
        #[structopt(name = "CHANNEL", parse(try_from_str = parse_id))]
        channel: String,

        /// Pass the message in as an argument, otherwise use stdin
        #[structopt(long)]
        message: Option<String>,
    },
}

fn parse_id(input: &str) -> Result<String, String> {
    if is_valid_id(input) {
        Ok(input.to_string())
    } else {
        Err(format!("need a value with only chars in [a-zA-Z0-9-], got {input:?}"))
    }
}

fn main() {
    let ctl = Ctl::from_args();
    let settings = Settings::init(ctl.opts).expect("settings init failed");
    if let Err(e) = run(settings, ctl.command) {
        eprintln!("postbox-ctl: {e}");
        process::exit(1);
    }
}

fn run(settings: &Settings, command: Command) -> Result<()> {
    let admin = Admin::new(Mailbox::open(&settings.mailbox.dir)?);
    match command {
        Command::Session { session, channels, readable, writable, remove } => {
            if remove {
                admin.remove_session(&session)?;
                return Ok(());
            }
            // a session with no channels can connect but neither read nor write
            admin.create_session(&session)?;
            for channel in &channels {
                if readable {
                    admin.add_readable(&session, channel)?;
                } else {
                    admin.remove_readable(&session, channel)?;
                }
                if writable {
                    admin.add_writable(&session, channel)?;
                } else {
                    admin.remove_writable(&session, channel)?;
                }
            }
            Ok(())
        }
        Command::Publish { channel, message } => {
            let payload = match message {
                Some(message) => message.into_bytes(),
                None => {
                    let mut buf = Vec::new();
                    std::io::stdin().read_to_end(&mut buf)?;
                    buf
                }
            };
            admin.publish(&channel, &payload)?;
            Ok(())
        }
    }
}
