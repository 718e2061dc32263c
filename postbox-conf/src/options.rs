use structopt::StructOpt;

#[derive(StructOpt, Debug, Clone, Default)]
pub struct Options {
    /// Config filename
    #[structopt(name = "config", short = "f", long)]
    pub cfg_name: Option<String>,

    /// Mailbox base directory, overrides the config file
    #[structopt(name = "dir", short = "d", long)]
    pub dir: Option<String>,

    /// Listener address, e.g. 0.0.0.0:5600
    #[structopt(name = "addr", long)]
    pub addr: Option<std::net::SocketAddr>,
}
