use crate::codec::header::HeaderEncoder;
use crate::protocol::{EchoResponse, SendError};
use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

/// Encodes a complete [`EchoResponse`]: head first, then the body bytes.
#[derive(Debug)]
pub struct ResponseEncoder {
    header_encoder: HeaderEncoder,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for ResponseEncoder {
    fn default() -> Self {
        Self { header_encoder: HeaderEncoder }
    }
}

impl Encoder<EchoResponse> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: EchoResponse, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.header_encoder.encode(&item, dst)?;
        dst.reserve(item.content_length());
        dst.put_slice(item.body());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn content_length_matches_echoed_body() {
        let body = Bytes::from_static(b"ping\r\n\r\npong");
        let response = EchoResponse::new("micro-echo".into(), body.clone());
        let mut dst = BytesMut::new();

        ResponseEncoder::new().encode(response, &mut dst).unwrap();

        let expected = format!(
            "HTTP/1.1 200 OK\r\nServer: micro-echo\r\nConnection: close\r\nContent-Length: {}\r\n\r\nping\r\n\r\npong",
            body.len()
        );
        assert_eq!(&dst[..], expected.as_bytes());
    }
}
