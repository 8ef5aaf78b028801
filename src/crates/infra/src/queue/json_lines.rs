use application::consumer::{Delivery, RequestQueue};
use application::error::AppError;
use async_trait::async_trait;
use log::debug;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

/// 每行一条 JSON 消息的队列，空行跳过，EOF 即关闭
///
/// Lines are handed over as raw bytes; a line that is not valid UTF-8 is
/// still a delivery and fails later in decoding, not in the transport.
pub struct JsonLinesQueue<R> {
    reader: R,
    next_tag: u64,
    last_acked: Option<u64>,
}

impl<R> JsonLinesQueue<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            next_tag: 0,
            last_acked: None,
        }
    }

    pub fn last_acked(&self) -> Option<u64> {
        self.last_acked
    }
}

impl JsonLinesQueue<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

fn trim_line(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\n' | b'\r'] = line {
        line = rest;
    }
    line
}

#[async_trait]
impl<R> RequestQueue for JsonLinesQueue<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn receive(&mut self) -> Result<Option<Delivery>, AppError> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(|e| AppError::QueueError(e.to_string()))?;
            if read == 0 {
                return Ok(None);
            }

            let line = trim_line(&buf);
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            self.next_tag += 1;
            return Ok(Some(Delivery {
                tag: self.next_tag,
                payload: line.to_vec(),
            }));
        }
    }

    async fn ack(&mut self, tag: u64) -> Result<(), AppError> {
        debug!("ack message {}", tag);
        self.last_acked = Some(tag);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_receive_skips_blank_lines() {
        let input: &[u8] = b"{\"a\": 1}\n\n   \n{\"b\": 2}\n";
        let mut queue = JsonLinesQueue::new(input);

        let first = queue.receive().await.unwrap().unwrap();
        assert_eq!(first.tag, 1);
        assert_eq!(first.payload, b"{\"a\": 1}");
        queue.ack(first.tag).await.unwrap();

        let second = queue.receive().await.unwrap().unwrap();
        assert_eq!(second.tag, 2);
        assert_eq!(queue.last_acked(), Some(1));

        assert!(queue.receive().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_receive_passes_invalid_utf8_through() {
        let input: &[u8] = b"\xff\xfe garbage\r\n{\"b\": 2}";
        let mut queue = JsonLinesQueue::new(input);

        let first = queue.receive().await.unwrap().unwrap();
        assert_eq!(first.payload, b"\xff\xfe garbage");

        // 末行没有换行符也要交付
        let second = queue.receive().await.unwrap().unwrap();
        assert_eq!(second.tag, 2);
        assert_eq!(second.payload, b"{\"b\": 2}");

        assert!(queue.receive().await.unwrap().is_none());
    }
}
