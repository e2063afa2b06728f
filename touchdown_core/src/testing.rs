use std::{borrow::Cow, sync::Arc};

use crate::{
    callable::{Dispatcher, Registry},
    event::Privmsg,
    render::Response,
};

/// Drives a registry the way the chat loop would
pub struct TestDispatch {
    dispatcher: Dispatcher,
    responses: Vec<Response>,
    channel: Cow<'static, str>,
    sender: Cow<'static, str>,
}

impl TestDispatch {
    pub fn new(registry: Registry) -> Self {
        Self {
            dispatcher: Dispatcher::new(Arc::new(registry)),
            responses: Vec::new(),
            channel: Cow::from("#test_channel"),
            sender: Cow::from("test_user"),
        }
    }

    pub fn with_sender(mut self, sender: &str) -> Self {
        self.sender = sender.to_string().into();
        self
    }

    pub fn with_channel(mut self, channel: &str) -> Self {
        self.channel = channel.to_string().into();
        self
    }

    pub fn get_response(&mut self) -> Vec<Response> {
        std::mem::take(&mut self.responses)
    }

    pub async fn send_message(&mut self, data: &str) {
        let pm = Privmsg {
            sender: Arc::from(&*self.sender),
            target: Arc::from(&*self.channel),
            body: Arc::from(data),
        };
        let out = self.dispatcher.dispatch(&pm).await;
        self.responses.extend(out);
    }
}
