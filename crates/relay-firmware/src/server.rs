//! TCP listener for the HTTP control surface
//!
//! One connection is served at a time: read the request head, lock the
//! shared device state just long enough to run the handler, write the
//! response and close.

use embassy_net::Stack;
use embassy_net::tcp::TcpSocket;
use embassy_time::{Duration, Timer};
use embedded_io_async::Write as _;
use log::{debug, warn};
use relay_core::config::{HTTP_PORT, NET_POLL_MS};
use relay_core::http::{self, Request, Response};

use crate::app_state::FirmwareSharedState;
use crate::assets::FlashAssets;

const MAX_REQUEST_SIZE: usize = 1024;
const SOCKET_TIMEOUT: Duration = Duration::from_secs(10);

#[embassy_executor::task]
pub async fn http_task(
    stack: Stack<'static>,
    device: &'static FirmwareSharedState,
    assets: FlashAssets,
) {
    let mut rx_buf = [0u8; 1024];
    let mut tx_buf = [0u8; 2048];

    loop {
        stack.wait_config_up().await;

        let mut socket = TcpSocket::new(stack, &mut rx_buf, &mut tx_buf);
        socket.set_timeout(Some(SOCKET_TIMEOUT));

        match socket.accept(HTTP_PORT).await {
            Ok(()) => {
                if let Err(e) = serve_connection(&mut socket, device, &assets).await {
                    warn!("HTTP connection error: {:?}", e);
                }
            }
            Err(e) => {
                warn!("HTTP accept error: {:?}", e);
                Timer::after(Duration::from_millis(NET_POLL_MS)).await;
            }
        }

        socket.close();
        Timer::after(Duration::from_millis(NET_POLL_MS)).await;
        socket.abort();
    }
}

async fn serve_connection(
    socket: &mut TcpSocket<'_>,
    device: &'static FirmwareSharedState,
    assets: &FlashAssets,
) -> Result<(), embassy_net::tcp::Error> {
    let mut buf = [0u8; MAX_REQUEST_SIZE];
    let mut total = 0usize;

    // Read until the end of the headers or until the buffer is full.
    loop {
        let n = socket.read(&mut buf[total..]).await?;
        if n == 0 {
            break;
        }
        total += n;
        if total >= MAX_REQUEST_SIZE || buf[..total].windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    if total == 0 {
        return Ok(());
    }

    let response = match core::str::from_utf8(&buf[..total])
        .map_err(|_| relay_core::Error::InvalidParameter("request encoding"))
        .and_then(Request::parse)
    {
        Ok(request) => {
            let mut state = device.lock().await;
            http::handle(&request, &mut *state, assets)
        }
        Err(e) => Response::from_error(e),
    };

    debug!("HTTP response {}", response.status.code());
    socket.write_all(response.head().as_bytes()).await?;
    socket.write_all(response.body.as_bytes()).await?;
    socket.flush().await?;
    Ok(())
}
