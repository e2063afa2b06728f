/// Something a handler wants written back to the channel
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    /// said to the channel as-is
    Say(String),
    /// addressed to whoever issued the command
    Reply(String),
    /// reported as a problem
    Problem(String),
}

impl Response {
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::default()
    }
    pub fn say(data: impl Into<String>) -> ResponseBuilder {
        Self::builder().say(data)
    }
    pub fn reply(data: impl Into<String>) -> ResponseBuilder {
        Self::builder().reply(data)
    }
    pub fn problem(data: impl Into<String>) -> ResponseBuilder {
        Self::builder().problem(data)
    }
}

#[derive(Default, Debug)]
pub struct ResponseBuilder(Vec<Response>);
impl ResponseBuilder {
    pub fn say(mut self, data: impl Into<String>) -> Self {
        self.0.push(Response::Say(data.into()));
        self
    }
    pub fn reply(mut self, data: impl Into<String>) -> Self {
        self.0.push(Response::Reply(data.into()));
        self
    }
    pub fn problem(mut self, data: impl Into<String>) -> Self {
        self.0.push(Response::Problem(data.into()));
        self
    }
    pub fn finish(self) -> Vec<Response> {
        self.0
    }
}

/// Turns a handler's output into responses
pub trait Render
where
    Self: Send + Sync,
{
    fn render(&self) -> Vec<Response>;
}

impl Render for ResponseBuilder {
    fn render(&self) -> Vec<Response> {
        self.0.clone()
    }
}

impl Render for Response {
    fn render(&self) -> Vec<Response> {
        vec![self.clone()]
    }
}

impl<T: Render> Render for &T {
    fn render(&self) -> Vec<Response> {
        (*self).render()
    }
}

impl<T: Render> Render for Vec<T> {
    fn render(&self) -> Vec<Response> {
        self.iter().flat_map(Render::render).collect()
    }
}

impl<T: Render> Render for Option<T> {
    fn render(&self) -> Vec<Response> {
        self.as_ref().map(Render::render).unwrap_or_default()
    }
}

impl Render for str {
    fn render(&self) -> Vec<Response> {
        if self.trim().is_empty() {
            return vec![];
        }
        vec![Response::Say(self.to_string())]
    }
}

impl Render for &'static str {
    fn render(&self) -> Vec<Response> {
        (**self).render()
    }
}

impl Render for String {
    fn render(&self) -> Vec<Response> {
        self.as_str().render()
    }
}

impl Render for () {
    fn render(&self) -> Vec<Response> {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_output_says_nothing() {
        assert!("   ".render().is_empty());
        assert!(String::new().render().is_empty());
        assert!(().render().is_empty());
        assert!(None::<String>.render().is_empty());
    }

    #[test]
    fn builder_keeps_order() {
        let out = Response::say("a").reply("b").problem("c").render();
        assert_eq!(
            out,
            [
                Response::Say("a".into()),
                Response::Reply("b".into()),
                Response::Problem("c".into())
            ]
        );
    }
}
