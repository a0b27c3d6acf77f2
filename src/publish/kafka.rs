use std::time::Duration;

use rdkafka::ClientConfig;
use rdkafka::client::ClientContext;
use rdkafka::error::KafkaError;
use rdkafka::message::Message;
use rdkafka::producer::{BaseRecord, DeliveryResult, Producer, ProducerContext, ThreadedProducer};
use rdkafka::util::Timeout;
use tracing::info;

use crate::error::PublishError;
use crate::models::KafkaSettings;
use crate::publish::broker::{AckSender, Acknowledgment, Broker, PendingAck};

/// Routes librdkafka delivery reports to the [`PendingAck`] of each record.
pub struct AckContext;

impl ClientContext for AckContext {}

impl ProducerContext for AckContext {
    type DeliveryOpaque = Box<AckSender>;

    fn delivery(
        &self,
        delivery_result: &DeliveryResult<'_>,
        delivery_opaque: Self::DeliveryOpaque,
    ) {
        match delivery_result {
            Ok(message) => (*delivery_opaque).acknowledge(Acknowledgment {
                partition: message.partition(),
                offset: message.offset(),
            }),
            Err((error, _)) => (*delivery_opaque).fail(error.to_string()),
        }
    }
}

/// Kafka producer keyed by big-endian `i64`, with JSON values.
pub struct KafkaBroker {
    producer: Option<ThreadedProducer<AckContext>>,
    topic: String,
}

impl KafkaBroker {
    pub fn connect(settings: &KafkaSettings) -> Result<Self, KafkaError> {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &settings.bootstrap_servers)
            .set("client.id", &settings.client_id)
            .set("acks", "all")
            .set("enable.idempotence", "true");
        for (key, value) in &settings.extra {
            config.set(key, value);
        }

        let producer: ThreadedProducer<AckContext> = config.create_with_context(AckContext)?;
        info!(
            bootstrap_servers = %settings.bootstrap_servers,
            topic = %settings.topic,
            "kafka producer created"
        );

        Ok(Self {
            producer: Some(producer),
            topic: settings.topic.clone(),
        })
    }
}

impl Broker for KafkaBroker {
    fn send(&mut self, key: i64, value: &[u8]) -> Result<PendingAck, PublishError> {
        let producer = self.producer.as_ref().ok_or_else(|| PublishError::Failure {
            key,
            reason: "producer is closed".to_string(),
        })?;

        let (tx, pending) = PendingAck::channel(key);
        let key_bytes = key.to_be_bytes();
        let record = BaseRecord::with_opaque_to(&self.topic, Box::new(tx))
            .key(&key_bytes[..])
            .payload(value);

        producer
            .send(record)
            .map_err(|(e, _)| PublishError::Failure {
                key,
                reason: e.to_string(),
            })?;
        Ok(pending)
    }

    fn flush(&mut self, timeout: Duration) -> Result<(), PublishError> {
        match &self.producer {
            Some(producer) => producer
                .flush(Timeout::After(timeout))
                .map_err(|e| PublishError::Flush(e.to_string())),
            None => Ok(()),
        }
    }

    fn close(&mut self) {
        if self.producer.take().is_some() {
            info!(topic = %self.topic, "kafka producer closed");
        }
    }
}
