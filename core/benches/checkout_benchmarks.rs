use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use storefront_core::{
  CartLine, Checkout, CheckoutSettings, ContextData, Flow, FlowError, FlowRegistry, MemoryStore, StepControl,
};
use tokio::runtime::Runtime;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
enum BenchError {
  #[error(transparent)]
  Flow(#[from] FlowError),
}

#[derive(Clone, Debug, Default)]
struct BenchContext {
  counter: u64,
}

fn seeded_store(rt: &Runtime, products: usize) -> (MemoryStore, Vec<Uuid>) {
  rt.block_on(async {
    let store = MemoryStore::new();
    let mut ids = Vec::with_capacity(products);
    for i in 0..products {
      ids.push(store.insert_product(&format!("product-{}", i), 100 + i as i64, i32::MAX).await);
    }
    (store, ids)
  })
}

fn bench_checkout_cart_size(c: &mut Criterion) {
  let mut group = c.benchmark_group("CheckoutCartSize");
  let rt = Runtime::new().unwrap();

  for lines in [1usize, 5, 20] {
    let (store, ids) = seeded_store(&rt, lines);
    let checkout = Checkout::new(Arc::new(store), CheckoutSettings::default());
    let cart: Vec<CartLine> = ids.iter().map(|id| CartLine::new(*id, 1)).collect();
    let user = Uuid::new_v4();

    group.throughput(Throughput::Elements(lines as u64));
    group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, _| {
      b.to_async(&rt).iter(|| async {
        checkout.place_order(Some(user), cart.clone()).await.unwrap();
      })
    });
  }
  group.finish();
}

fn bench_checkout_contended(c: &mut Criterion) {
  let mut group = c.benchmark_group("CheckoutContended");
  let rt = Runtime::new().unwrap();

  for buyers in [2usize, 8] {
    let (store, ids) = seeded_store(&rt, 3);
    let checkout = Arc::new(Checkout::new(Arc::new(store), CheckoutSettings::default()));
    let cart: Vec<CartLine> = ids.iter().map(|id| CartLine::new(*id, 1)).collect();

    group.throughput(Throughput::Elements(buyers as u64));
    group.bench_with_input(BenchmarkId::from_parameter(buyers), &buyers, |b, &buyers| {
      b.to_async(&rt).iter(|| {
        let checkout = checkout.clone();
        let cart = cart.clone();
        async move {
          let handles: Vec<_> = (0..buyers)
            .map(|_| {
              let checkout = checkout.clone();
              let cart = cart.clone();
              tokio::spawn(async move { checkout.place_order(Some(Uuid::new_v4()), cart).await })
            })
            .collect();
          for handle in handles {
            handle.await.unwrap().unwrap();
          }
        }
      })
    });
  }
  group.finish();
}

fn bench_flow_dispatch(c: &mut Criterion) {
  let mut group = c.benchmark_group("FlowDispatch");
  let rt = Runtime::new().unwrap();

  for steps in [1usize, 5, 10] {
    let names: Vec<String> = (0..steps).map(|i| format!("step_{}", i)).collect();
    let defs: Vec<(&str, bool)> = names.iter().map(|n| (n.as_str(), false)).collect();
    let mut flow = Flow::<BenchContext, BenchError>::new(&defs);
    for name in &names {
      flow.on(name, |ctx: ContextData<BenchContext>| async move {
        ctx.write().counter += 1;
        Ok::<_, BenchError>(StepControl::Continue)
      });
    }
    let registry = FlowRegistry::<BenchError>::new();
    registry.register(flow);

    group.bench_with_input(BenchmarkId::from_parameter(steps), &steps, |b, _| {
      b.to_async(&rt).iter(|| async {
        registry.run(ContextData::new(BenchContext::default())).await.unwrap();
      })
    });
  }
  group.finish();
}

criterion_group!(benches, bench_checkout_cart_size, bench_checkout_contended, bench_flow_dispatch);
criterion_main!(benches);
