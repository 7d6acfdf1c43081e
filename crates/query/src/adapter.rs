//! Query adapters.
//!
//! A [`QueryAdapter`] is configuration, not subclassing: the remote operation
//! name, the required context parameters, a parameter-building closure and a
//! row parser are supplied at construction and the adapter wires them to the
//! transport. Each adapter owns its own single-slot
//! [`AsyncDispatcher`] (one correlator per view or list) while the
//! transport itself is shared.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use mrpc_broker::{AsyncDispatcher, CallEvent, CallOutcome, RpcParam, RpcTransport};
use mrpc_types::RpcName;

use crate::context::QueryContext;
use crate::outcome::{QueryOutcome, LOCAL_ERROR_CODE};
use crate::reply;

type ParamBuilder = Box<dyn Fn(&QueryContext) -> Vec<RpcParam>>;
type RowParser<R> = Rc<dyn Fn(&[String]) -> Option<R>>;
type FinishSlot<R> = Rc<RefCell<Option<Box<dyn FnOnce(QueryOutcome<R>)>>>>;

/// Binds one named remote operation to an argument policy and a row parser.
pub struct QueryAdapter<R> {
    operation: RpcName,
    required: Vec<String>,
    field_delimiter: char,
    param_builder: ParamBuilder,
    parse_row: RowParser<R>,
    transport: Rc<dyn RpcTransport>,
    dispatcher: Rc<RefCell<AsyncDispatcher>>,
}

impl<R: 'static> QueryAdapter<R> {
    /// Creates an adapter with no required parameters, an empty argument
    /// list and the `^` field delimiter.
    ///
    /// `parse_row` turns one row of positional fields into a typed result;
    /// returning `None` skips the row (logged, never fatal).
    pub fn new(
        operation: RpcName,
        transport: Rc<dyn RpcTransport>,
        parse_row: impl Fn(&[String]) -> Option<R> + 'static,
    ) -> Self {
        let dispatcher = Rc::new(RefCell::new(AsyncDispatcher::new(Rc::clone(&transport))));
        Self {
            operation,
            required: Vec::new(),
            field_delimiter: '^',
            param_builder: Box::new(|_| Vec::new()),
            parse_row: Rc::new(parse_row),
            transport,
            dispatcher,
        }
    }

    /// Names the context parameters without which a fetch is not attempted.
    pub fn with_required(mut self, names: &[&str]) -> Self {
        self.required = names.iter().map(|name| (*name).to_owned()).collect();
        self
    }

    /// Sets the policy that builds positional call arguments from a context.
    pub fn with_params(mut self, build: impl Fn(&QueryContext) -> Vec<RpcParam> + 'static) -> Self {
        self.param_builder = Box::new(build);
        self
    }

    /// Overrides the field delimiter (some lookup procedures use `;`).
    pub fn with_field_delimiter(mut self, delimiter: char) -> Self {
        self.field_delimiter = delimiter;
        self
    }

    /// The remote operation this adapter fetches from.
    pub fn operation(&self) -> &RpcName {
        &self.operation
    }

    /// The adapter's correlator, for the host's handle-based callback routing.
    pub fn dispatcher(&self) -> Rc<RefCell<AsyncDispatcher>> {
        Rc::clone(&self.dispatcher)
    }

    /// Returns whether every required parameter is present in the context.
    pub fn is_applicable(&self, ctx: &QueryContext) -> bool {
        let names: Vec<&str> = self.required.iter().map(String::as_str).collect();
        ctx.has_all(&names)
    }

    /// Builds the positional call arguments for a context. Pure.
    pub fn build_params(&self, ctx: &QueryContext) -> Vec<RpcParam> {
        (self.param_builder)(ctx)
    }

    /// Fetches synchronously, blocking the calling thread.
    ///
    /// The outcome is always an envelope: a non-applicable context, a
    /// transport failure and a server-signalled status line all settle in
    /// their respective variants rather than unwinding.
    pub fn fetch_sync(&self, ctx: &QueryContext) -> QueryOutcome<R> {
        if !self.is_applicable(ctx) {
            return QueryOutcome::NotApplicable;
        }

        let params = self.build_params(ctx);
        match self.transport.call_sync(self.operation.as_str(), &params) {
            Ok(payload) => parse_rows(
                &payload,
                self.field_delimiter,
                self.parse_row.as_ref(),
                self.operation.as_str(),
            ),
            Err(error) => QueryOutcome::from_transport_error(error),
        }
    }

    /// Fetches asynchronously through the adapter's dispatcher.
    ///
    /// `on_finish` is called exactly once with the outcome. A non-applicable
    /// context and a transport that refuses to start the call both settle
    /// synchronously; otherwise the outcome arrives when the host routes the
    /// transport's callback to [`dispatcher`](Self::dispatcher). Issuing a
    /// new fetch while one is in flight aborts the old one, settling it with
    /// [`QueryOutcome::Aborted`].
    ///
    /// Outcomes are delivered while the dispatcher is borrowed, so `on_finish`
    /// must not synchronously start or cancel fetches on the same adapter.
    pub fn fetch_async(
        &self,
        ctx: &QueryContext,
        on_finish: impl FnOnce(QueryOutcome<R>) + 'static,
    ) -> FetchHandle {
        let settled = Rc::new(Cell::new(false));

        if !self.is_applicable(ctx) {
            settled.set(true);
            on_finish(QueryOutcome::NotApplicable);
            return FetchHandle {
                dispatcher: Rc::clone(&self.dispatcher),
                settled,
            };
        }

        let params = self.build_params(ctx);
        let slot: FinishSlot<R> = Rc::new(RefCell::new(Some(Box::new(on_finish))));

        let deliver = {
            let slot = Rc::clone(&slot);
            let settled = Rc::clone(&settled);
            let parse_row = Rc::clone(&self.parse_row);
            let delimiter = self.field_delimiter;
            move |event: CallEvent| {
                if let Some(finish) = slot.borrow_mut().take() {
                    settled.set(true);
                    let outcome = match event.outcome {
                        CallOutcome::Success(payload) => {
                            parse_rows(&payload, delimiter, parse_row.as_ref(), &event.operation)
                        }
                        CallOutcome::Error { code, message } => {
                            QueryOutcome::Failed { code, message }
                        }
                        CallOutcome::Aborted => QueryOutcome::Aborted,
                    };
                    finish(outcome);
                }
            }
        };

        let refused = {
            let mut dispatcher = self.dispatcher.borrow_mut();
            dispatcher.invoke(&self.operation, &params, deliver);
            !dispatcher.is_pending()
        };

        if refused {
            // The correlator stays silent on a refused start; settle the
            // caller here so `on_finish` is never left dangling.
            if let Some(finish) = slot.borrow_mut().take() {
                settled.set(true);
                finish(QueryOutcome::Failed {
                    code: LOCAL_ERROR_CODE,
                    message: format!("call {} could not be started", self.operation),
                });
            }
        }

        FetchHandle {
            dispatcher: Rc::clone(&self.dispatcher),
            settled,
        }
    }
}

/// Cancellation handle for one asynchronous fetch.
pub struct FetchHandle {
    dispatcher: Rc<RefCell<AsyncDispatcher>>,
    settled: Rc<Cell<bool>>,
}

impl FetchHandle {
    /// Cancels the fetch if it has not settled yet.
    ///
    /// Aborts the transport-side call and synchronously delivers an
    /// [`QueryOutcome::Aborted`] envelope to the fetch's `on_finish`. A no-op
    /// once the fetch has settled for any reason, including supersession by a
    /// newer fetch on the same adapter.
    pub fn cancel(&self) {
        if !self.settled.get() {
            self.dispatcher.borrow_mut().abort();
        }
    }

    /// Returns whether the fetch has settled.
    pub fn is_settled(&self) -> bool {
        self.settled.get()
    }
}

/// Parse a raw payload into the row envelope, skipping rejected rows.
fn parse_rows<R>(
    payload: &str,
    delimiter: char,
    parse_row: &dyn Fn(&[String]) -> Option<R>,
    operation: &str,
) -> QueryOutcome<R> {
    match reply::parse_reply(payload, delimiter) {
        Ok(rows) => {
            let mut parsed = Vec::with_capacity(rows.len());
            for row in &rows {
                match parse_row(row) {
                    Some(value) => parsed.push(value),
                    None => {
                        tracing::warn!(operation, row = ?row, "skipping row the parser rejected");
                    }
                }
            }
            QueryOutcome::Rows(parsed)
        }
        Err(error) => QueryOutcome::from_reply_error(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrpc_broker::{CallHandle, TransportError};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum TransportOp {
        Start { operation: String },
        Abort { handle: u32 },
        Sync { operation: String },
    }

    /// Scripted transport for adapter tests.
    #[derive(Default)]
    struct MockTransport {
        next_handles: RefCell<Vec<u32>>,
        sync_reply: RefCell<Option<Result<String, TransportError>>>,
        log: RefCell<Vec<TransportOp>>,
    }

    impl MockTransport {
        fn with_handles(handles: &[u32]) -> Rc<Self> {
            let mock = Self::default();
            *mock.next_handles.borrow_mut() = handles.iter().rev().copied().collect();
            Rc::new(mock)
        }

        fn with_sync_reply(reply: Result<&str, TransportError>) -> Rc<Self> {
            let mock = Self::default();
            *mock.sync_reply.borrow_mut() = Some(reply.map(str::to_owned));
            Rc::new(mock)
        }

        fn log(&self) -> Vec<TransportOp> {
            self.log.borrow().clone()
        }
    }

    impl RpcTransport for MockTransport {
        fn start_async(&self, operation: &str, _params: &[RpcParam]) -> Option<CallHandle> {
            self.log.borrow_mut().push(TransportOp::Start {
                operation: operation.to_owned(),
            });
            CallHandle::from_wire(self.next_handles.borrow_mut().pop().unwrap_or(0))
        }

        fn abort_call(&self, handle: CallHandle) {
            self.log.borrow_mut().push(TransportOp::Abort {
                handle: handle.get(),
            });
        }

        fn call_sync(
            &self,
            operation: &str,
            _params: &[RpcParam],
        ) -> Result<String, TransportError> {
            self.log.borrow_mut().push(TransportOp::Sync {
                operation: operation.to_owned(),
            });
            self.sync_reply
                .borrow_mut()
                .take()
                .unwrap_or(Err(TransportError::NotConnected))
        }
    }

    fn fields_adapter(transport: Rc<MockTransport>) -> QueryAdapter<Vec<String>> {
        QueryAdapter::new(
            RpcName::new("ORWPT LIST ALL").expect("valid name"),
            transport as Rc<dyn RpcTransport>,
            |row| Some(row.to_vec()),
        )
    }

    fn outcome_sink<R: 'static>() -> (
        Rc<RefCell<Vec<QueryOutcome<R>>>>,
        impl FnOnce(QueryOutcome<R>) + 'static,
    ) {
        let outcomes = Rc::new(RefCell::new(Vec::new()));
        let sink = {
            let outcomes = Rc::clone(&outcomes);
            move |outcome: QueryOutcome<R>| outcomes.borrow_mut().push(outcome)
        };
        (outcomes, sink)
    }

    fn handle(raw: u32) -> CallHandle {
        CallHandle::new(raw).expect("non-zero test handle")
    }

    #[test]
    fn fetch_sync_parses_rows_through_the_envelope() {
        let transport = MockTransport::with_sync_reply(Ok("229^SMITH,JOHN\r\n230^DOE,JANE"));
        let adapter = fields_adapter(Rc::clone(&transport));

        let outcome = adapter.fetch_sync(&QueryContext::new());

        assert_eq!(
            outcome,
            QueryOutcome::Rows(vec![
                vec!["229".to_owned(), "SMITH,JOHN".to_owned()],
                vec!["230".to_owned(), "DOE,JANE".to_owned()],
            ])
        );
        assert_eq!(
            transport.log(),
            vec![TransportOp::Sync {
                operation: "ORWPT LIST ALL".to_owned(),
            }]
        );
    }

    #[test]
    fn fetch_sync_skips_rows_the_parser_rejects() {
        let transport = MockTransport::with_sync_reply(Ok("229^SMITH,JOHN\r\nmalformed"));
        let adapter = QueryAdapter::new(
            RpcName::new("ORWPT LIST ALL").expect("valid name"),
            Rc::clone(&transport) as Rc<dyn RpcTransport>,
            |row: &[String]| {
                if row.len() >= 2 {
                    Some((row[0].clone(), row[1].clone()))
                } else {
                    None
                }
            },
        );

        let outcome = adapter.fetch_sync(&QueryContext::new());
        assert_eq!(
            outcome,
            QueryOutcome::Rows(vec![("229".to_owned(), "SMITH,JOHN".to_owned())])
        );
    }

    #[test]
    fn fetch_sync_gates_on_required_parameters() {
        let transport = MockTransport::with_sync_reply(Ok("unused"));
        let adapter = fields_adapter(Rc::clone(&transport)).with_required(&["patient"]);

        let outcome = adapter.fetch_sync(&QueryContext::new());

        assert_eq!(outcome, QueryOutcome::NotApplicable);
        assert!(transport.log().is_empty(), "fetch must be suppressed");
    }

    #[test]
    fn fetch_sync_maps_transport_errors_to_failed() {
        let transport = MockTransport::with_sync_reply(Err(TransportError::Remote {
            code: 500,
            message: "timeout".to_owned(),
        }));
        let adapter = fields_adapter(transport);

        let outcome = adapter.fetch_sync(&QueryContext::new());
        assert_eq!(
            outcome,
            QueryOutcome::Failed {
                code: 500,
                message: "timeout".to_owned(),
            }
        );
    }

    #[test]
    fn fetch_sync_detects_the_server_error_line() {
        let transport = MockTransport::with_sync_reply(Ok("^No patients found\r\nA^1"));
        let adapter = fields_adapter(transport);

        let outcome = adapter.fetch_sync(&QueryContext::new());
        assert_eq!(
            outcome,
            QueryOutcome::Failed {
                code: LOCAL_ERROR_CODE,
                message: "No patients found".to_owned(),
            }
        );
    }

    #[test]
    fn fetch_async_round_trips_a_delimited_payload() {
        let transport = MockTransport::with_handles(&[7]);
        let adapter = fields_adapter(Rc::clone(&transport));
        let (outcomes, sink) = outcome_sink();

        adapter.fetch_async(&QueryContext::new(), sink);
        adapter
            .dispatcher()
            .borrow_mut()
            .on_complete(handle(7), "A^1\r\nB^2".to_owned());

        assert_eq!(
            outcomes.borrow().as_slice(),
            &[QueryOutcome::Rows(vec![
                vec!["A".to_owned(), "1".to_owned()],
                vec!["B".to_owned(), "2".to_owned()],
            ])]
        );
    }

    #[test]
    fn fetch_async_maps_transport_errors_to_failed() {
        let transport = MockTransport::with_handles(&[7]);
        let adapter = fields_adapter(Rc::clone(&transport));
        let (outcomes, sink) = outcome_sink();

        adapter.fetch_async(&QueryContext::new(), sink);
        adapter
            .dispatcher()
            .borrow_mut()
            .on_error(handle(7), 500, "timeout".to_owned());

        assert_eq!(
            outcomes.borrow().as_slice(),
            &[QueryOutcome::Failed {
                code: 500,
                message: "timeout".to_owned(),
            }]
        );
    }

    #[test]
    fn fetch_async_delivers_not_applicable_synchronously() {
        let transport = MockTransport::with_handles(&[7]);
        let adapter = fields_adapter(Rc::clone(&transport)).with_required(&["patient"]);
        let (outcomes, sink) = outcome_sink();

        let fetch = adapter.fetch_async(&QueryContext::new(), sink);

        assert!(fetch.is_settled());
        assert_eq!(outcomes.borrow().as_slice(), &[QueryOutcome::NotApplicable]);
        assert!(transport.log().is_empty());
    }

    #[test]
    fn cancel_delivers_aborted_synchronously_exactly_once() {
        let transport = MockTransport::with_handles(&[7]);
        let adapter = fields_adapter(Rc::clone(&transport));
        let (outcomes, sink) = outcome_sink();

        let fetch = adapter.fetch_async(&QueryContext::new(), sink);
        fetch.cancel();
        fetch.cancel();

        assert_eq!(outcomes.borrow().as_slice(), &[QueryOutcome::Aborted]);
        assert_eq!(
            transport.log(),
            vec![
                TransportOp::Start {
                    operation: "ORWPT LIST ALL".to_owned(),
                },
                TransportOp::Abort { handle: 7 },
            ]
        );
    }

    #[test]
    fn cancel_after_completion_is_a_no_op() {
        let transport = MockTransport::with_handles(&[7]);
        let adapter = fields_adapter(Rc::clone(&transport));
        let (outcomes, sink) = outcome_sink();

        let fetch = adapter.fetch_async(&QueryContext::new(), sink);
        adapter
            .dispatcher()
            .borrow_mut()
            .on_complete(handle(7), "A^1".to_owned());
        fetch.cancel();

        assert_eq!(outcomes.borrow().len(), 1);
        assert!(outcomes.borrow()[0].is_rows());
        assert!(
            !transport.log().contains(&TransportOp::Abort { handle: 7 }),
            "a settled fetch must not reach the transport"
        );
    }

    #[test]
    fn superseding_fetch_aborts_the_previous_one() {
        let transport = MockTransport::with_handles(&[7, 9]);
        let adapter = fields_adapter(Rc::clone(&transport));
        let (first_outcomes, first_sink) = outcome_sink();
        let (second_outcomes, second_sink) = outcome_sink();

        let first = adapter.fetch_async(&QueryContext::new(), first_sink);
        adapter.fetch_async(&QueryContext::new(), second_sink);

        assert!(first.is_settled());
        assert_eq!(first_outcomes.borrow().as_slice(), &[QueryOutcome::Aborted]);
        assert!(second_outcomes.borrow().is_empty());

        adapter
            .dispatcher()
            .borrow_mut()
            .on_complete(handle(9), "B^2".to_owned());
        assert!(second_outcomes.borrow()[0].is_rows());
    }

    #[test]
    fn refused_start_settles_with_failed() {
        let transport = MockTransport::with_handles(&[0]);
        let adapter = fields_adapter(Rc::clone(&transport));
        let (outcomes, sink) = outcome_sink();

        let fetch = adapter.fetch_async(&QueryContext::new(), sink);

        assert!(fetch.is_settled());
        assert!(matches!(
            &outcomes.borrow()[0],
            QueryOutcome::Failed {
                code: LOCAL_ERROR_CODE,
                ..
            }
        ));
    }

    #[test]
    fn build_params_consults_the_context() {
        let transport = MockTransport::with_sync_reply(Ok(""));
        let adapter = fields_adapter(Rc::clone(&transport))
            .with_required(&["patient"])
            .with_params(|ctx| {
                vec![RpcParam::literal(
                    ctx.get_str("patient").unwrap_or_default(),
                )]
            });

        let mut ctx = QueryContext::new();
        ctx.insert("patient", "229");

        assert!(adapter.is_applicable(&ctx));
        assert_eq!(
            adapter.build_params(&ctx),
            vec![RpcParam::literal("229")]
        );
        assert!(adapter.fetch_sync(&ctx).is_rows());
    }
}
