use std::io;
use std::net::TcpStream;

use tracing::info;

/// Open the blocking convergence-layer connection.
///
/// The stream carries no read or write timeouts: a read blocks until the
/// peer sends data or closes. The caller owns the stream, and `Drop`
/// releases the socket on every exit path.
pub fn connect(host: &str, port: u16) -> io::Result<TcpStream> {
    let stream = TcpStream::connect((host, port))?;
    info!(host, port, "connected to convergence layer");
    Ok(stream)
}
