//! ArgumentSet derive macro implementation

use heck::ToUpperCamelCase;
use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, parse_macro_input};

/// One `#[argument(...)]` field
struct ArgumentField {
    field_name: Ident,
    argument:   String,
    tag:        Ident,
}

/// Implementation of the ArgumentSet derive macro
pub fn derive_argument_set_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(error) => TokenStream::from(error.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;

    let Data::Struct(data_struct) = &input.data else {
        return Err(syn::Error::new_spanned(
            struct_name,
            "ArgumentSet can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data_struct.fields else {
        return Err(syn::Error::new_spanned(
            struct_name,
            "ArgumentSet requires named fields",
        ));
    };

    let arguments = fields
        .named
        .iter()
        .map(parse_field)
        .collect::<syn::Result<Vec<_>>>()?;

    let declarations = arguments.iter().map(|argument| {
        let name = &argument.argument;
        let tag = &argument.tag;
        quote! {
            let declaration = declaration.argument(#name, ::operation::TypeTag::#tag)?;
        }
    });

    let extractions = arguments.iter().map(|argument| {
        let field_name = &argument.field_name;
        let name = &argument.argument;
        quote! {
            #field_name: arguments.extract(#name)?
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::operation::ArgumentSet for #struct_name #ty_generics #where_clause {
            fn declare(
                declaration: ::operation::Declaration,
            ) -> ::operation::Result<::operation::Declaration> {
                #(#declarations)*
                Ok(declaration)
            }

            fn from_arguments(arguments: &::operation::Arguments) -> ::operation::Result<Self> {
                Ok(Self {
                    #(#extractions,)*
                })
            }
        }
    })
}

/// Read the tag and optional rename from a field's `#[argument(...)]`
fn parse_field(field: &syn::Field) -> syn::Result<ArgumentField> {
    let Some(field_name) = field.ident.clone() else {
        return Err(syn::Error::new_spanned(field, "ArgumentSet requires named fields"));
    };

    let Some(attr) = field
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("argument"))
    else {
        return Err(syn::Error::new_spanned(
            &field_name,
            "missing #[argument(<type tag>)] attribute",
        ));
    };

    let mut tag = None;
    let mut rename = None;

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("rename") {
            let value = meta.value()?;
            let s: LitStr = value.parse()?;
            rename = Some(s.value());
            Ok(())
        } else if let Some(ident) = meta.path.get_ident() {
            if tag.is_some() {
                return Err(meta.error("only one type tag per argument"));
            }
            let variant = ident.unraw().to_string().to_upper_camel_case();
            tag = Some(Ident::new(&variant, ident.span()));
            Ok(())
        } else {
            Err(meta.error("unsupported argument attribute"))
        }
    })?;

    let Some(tag) = tag else {
        return Err(syn::Error::new(
            Span::call_site(),
            format!("argument `{field_name}` needs a type tag, e.g. #[argument(string)]"),
        ));
    };

    let argument = rename.unwrap_or_else(|| field_name.unraw().to_string());

    Ok(ArgumentField {
        field_name,
        argument,
        tag,
    })
}
