#![deny(unsafe_code)]

use structopt::StructOpt;
use tokio::net::TcpListener;

use postbox::{Broker, BrokerHandle, BrokerOptions, Mailbox};
use postbox_conf::{Options, Settings};

mod connection;
mod logger;

fn main() {
    //init config
    let settings = Settings::init(Options::from_args()).expect("settings init failed");

    //init log
    logger::logger_init().expect("logger init failed");
    Settings::logs();

    //the broker owns all mutable state in one task; a current-thread
    //runtime keeps everything on a single OS thread
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime build failed");
    runtime.block_on(serve(settings));
}

async fn serve(settings: &Settings) {
    let mailbox = Mailbox::open(&settings.mailbox.dir).expect("mailbox init failed");
    let broker = Broker::new(
        mailbox,
        BrokerOptions {
            reap_interval: settings.reaper.interval,
            staleness: settings.reaper.staleness,
        },
    )
    .expect("broker init failed");
    let handle = broker.handle();
    tokio::spawn(broker.run());

    let addr = settings.listener.addr;
    let listener = TcpListener::bind(addr).await.expect("listener bind failed");
    log::info!("Starting postboxd Listening on {addr}");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("shutting down");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((socket, remote_addr)) => spawn_connection(socket, remote_addr, handle.clone()),
                Err(e) => log::warn!("accept failed: {e:?}"),
            },
        }
    }
}

fn spawn_connection(socket: tokio::net::TcpStream, remote_addr: std::net::SocketAddr, handle: BrokerHandle) {
    tokio::spawn(async move {
        if let Err(e) = connection::run(socket, remote_addr, handle).await {
            log::debug!("{remote_addr} connection ended: {e:?}");
        }
    });
}
