use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite};

/// A connected socket to a DoH provider (plain TCP or TLS over TCP).
/// Mimics net::StreamSocket.
#[derive(Debug)]
pub enum SocketType {
    Tcp(tokio::net::TcpStream),
    Ssl(tokio_boring::SslStream<tokio::net::TcpStream>),
}

impl SocketType {
    fn tcp(&self) -> &tokio::net::TcpStream {
        match self {
            SocketType::Tcp(s) => s,
            SocketType::Ssl(s) => s.get_ref(),
        }
    }

    /// Whether the socket carries TLS.
    pub fn is_tls(&self) -> bool {
        matches!(self, SocketType::Ssl(_))
    }

    /// The address of the provider this socket is connected to.
    pub fn peer_addr(&self) -> std::io::Result<SocketAddr> {
        self.tcp().peer_addr()
    }
}

impl AsyncRead for SocketType {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut tokio::io::ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            SocketType::Tcp(s) => Pin::new(s).poll_read(cx, buf),
            SocketType::Ssl(s) => Pin::new(s).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for SocketType {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        match self.get_mut() {
            SocketType::Tcp(s) => Pin::new(s).poll_write(cx, buf),
            SocketType::Ssl(s) => Pin::new(s).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            SocketType::Tcp(s) => Pin::new(s).poll_flush(cx),
            SocketType::Ssl(s) => Pin::new(s).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            SocketType::Tcp(s) => Pin::new(s).poll_shutdown(cx),
            SocketType::Ssl(s) => Pin::new(s).poll_shutdown(cx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::{TcpListener, TcpStream};

    #[tokio::test]
    async fn test_plain_socket_reports_peer() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (client, accepted) = tokio::join!(TcpStream::connect(addr), listener.accept());
        let socket = SocketType::Tcp(client.unwrap());
        let _server = accepted.unwrap();

        assert!(!socket.is_tls());
        assert_eq!(socket.peer_addr().unwrap(), addr);
    }
}
